// ── Operation notifications ──
//
// Every completed operation is published as an `OperationEvent`. Banners
// are derived from events by subscribers; reducers never see them.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use strum::Display;
use tokio::sync::broadcast;
use tracing::trace;

use crate::store::{FailurePayload, RequestId, SliceKey};

const EVENT_CHANNEL_SIZE: usize = 256;

/// Which part of the tree an operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Auth,
    Slice(SliceKey),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => f.write_str("auth"),
            Self::Slice(key) => write!(f, "{key}"),
        }
    }
}

/// Whether an operation wants a user-facing banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotifyPolicy {
    /// Message shown when the operation succeeds.
    pub on_success: Option<Cow<'static, str>>,
    /// Show the failure message when the operation fails.
    pub on_failure: bool,
}

impl NotifyPolicy {
    /// No banner either way (plain fetches).
    pub const SILENT: Self = Self {
        on_success: None,
        on_failure: false,
    };

    /// Banner on failure only.
    pub const FAILURES: Self = Self {
        on_success: None,
        on_failure: true,
    };

    /// Banner on success with `message`, and on failure.
    pub fn announce(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            on_success: Some(message.into()),
            on_failure: true,
        }
    }
}

/// Completion of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEvent {
    pub scope: Scope,
    pub op: &'static str,
    pub request: RequestId,
    pub result: Result<(), FailurePayload>,
    pub policy: NotifyPolicy,
    pub at: DateTime<Utc>,
}

impl OperationEvent {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// A one-shot banner for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// The banner `event` asks for under its policy, if any.
    pub fn from_event(event: &OperationEvent) -> Option<Self> {
        match &event.result {
            Ok(()) => event.policy.on_success.as_ref().map(|message| Self {
                level: NoticeLevel::Success,
                message: message.to_string(),
            }),
            Err(failure) if event.policy.on_failure => Some(Self {
                level: NoticeLevel::Failure,
                message: failure.message.clone(),
            }),
            Err(_) => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Publishes operation events. Sending with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<OperationEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OperationEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: OperationEvent) {
        trace!(scope = %event.scope, op = event.op, ok = event.succeeded(), "operation event");
        let _ = self.tx.send(event);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::FailureKind;

    fn event(result: Result<(), FailurePayload>, policy: NotifyPolicy) -> OperationEvent {
        OperationEvent {
            scope: Scope::Slice(SliceKey::Pets),
            op: "create",
            request: RequestId::next(),
            result,
            policy,
            at: Utc::now(),
        }
    }

    #[test]
    fn success_banner_follows_policy() {
        let notice =
            Notice::from_event(&event(Ok(()), NotifyPolicy::announce("Pet added"))).unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Pet added");

        assert_eq!(Notice::from_event(&event(Ok(()), NotifyPolicy::FAILURES)), None);
    }

    #[test]
    fn failure_banner_carries_server_message() {
        let failure = FailurePayload::new(FailureKind::Server, "Pet not found");
        let notice =
            Notice::from_event(&event(Err(failure.clone()), NotifyPolicy::FAILURES)).unwrap();
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert_eq!(notice.to_string(), "Pet not found");

        assert_eq!(
            Notice::from_event(&event(Err(failure), NotifyPolicy::SILENT)),
            None
        );
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let notifier = Notifier::new();
        // Publishing without subscribers must not fail.
        notifier.publish(event(Ok(()), NotifyPolicy::SILENT));

        let mut rx = notifier.subscribe();
        notifier.publish(event(Ok(()), NotifyPolicy::announce("done")));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.policy.on_success.as_deref(), Some("done"));
        assert_eq!(received.scope.to_string(), "pets");
    }
}
