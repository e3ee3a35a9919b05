// ── Actions ──
//
// Every state transition is described by one of these. Async operations
// emit Pending, then exactly one of Fulfilled / Rejected.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::failure::FailurePayload;
use super::state::SliceKey;
use crate::model::{AuthSession, EntityId, Record};

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Identifies one async operation across its three actions.
///
/// Diagnostic only: completions are not fenced by it, so the transition
/// that completes last wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn next() -> Self {
        Self(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a fulfilled operation merges into its slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Fetch-all: replace the collection wholesale.
    Replace(Vec<Record>),
    /// Fetch-by-id or aggregate: replace the `selected` record.
    Select(Option<Record>),
    /// Create: append to the collection.
    Append(Record),
    /// Update: replace the record with this identifier in place; no-op
    /// when absent.
    ReplaceById { id: EntityId, record: Record },
    /// Delete: remove the record with this identifier.
    RemoveById(EntityId),
    /// Empty the collection (e.g. clearing the cart).
    Clear,
    /// Status-only completion; the collection is untouched.
    Nothing,
}

impl Payload {
    fn label(&self) -> &'static str {
        match self {
            Self::Replace(_) => "replace",
            Self::Select(_) => "select",
            Self::Append(_) => "append",
            Self::ReplaceById { .. } => "replace_by_id",
            Self::RemoveById(_) => "remove_by_id",
            Self::Clear => "clear",
            Self::Nothing => "nothing",
        }
    }
}

/// Auth slice transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Pending { request: RequestId },
    LoggedIn { request: RequestId, session: AuthSession },
    /// An auth request (register, profile refresh) succeeded without
    /// changing the session.
    Settled { request: RequestId },
    Rejected { request: RequestId, error: FailurePayload },
    /// Reset auth and every session-scoped slice.
    LoggedOut,
}

/// All transitions the root reducer understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Pending {
        slice: SliceKey,
        op: &'static str,
        request: RequestId,
    },
    Fulfilled {
        slice: SliceKey,
        op: &'static str,
        request: RequestId,
        payload: Payload,
    },
    Rejected {
        slice: SliceKey,
        op: &'static str,
        request: RequestId,
        error: FailurePayload,
    },
    Auth(AuthAction),
    /// Return a slice to its initial state.
    Reset(SliceKey),
}

impl Action {
    /// The slice an action targets; `None` for auth actions.
    pub fn slice(&self) -> Option<SliceKey> {
        match self {
            Self::Pending { slice, .. }
            | Self::Fulfilled { slice, .. }
            | Self::Rejected { slice, .. }
            | Self::Reset(slice) => Some(*slice),
            Self::Auth(_) => None,
        }
    }

    /// Short `slice/op/phase` form for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Pending { slice, op, request } => format!("{slice}/{op}/pending {request}"),
            Self::Fulfilled {
                slice,
                op,
                request,
                payload,
            } => format!("{slice}/{op}/fulfilled {request} ({})", payload.label()),
            Self::Rejected {
                slice,
                op,
                request,
                error,
            } => format!("{slice}/{op}/rejected {request} ({})", error.kind),
            Self::Auth(AuthAction::Pending { request }) => format!("auth/pending {request}"),
            Self::Auth(AuthAction::LoggedIn { request, .. }) => {
                format!("auth/logged_in {request}")
            }
            Self::Auth(AuthAction::Settled { request }) => format!("auth/settled {request}"),
            Self::Auth(AuthAction::Rejected { request, error }) => {
                format!("auth/rejected {request} ({})", error.kind)
            }
            Self::Auth(AuthAction::LoggedOut) => "auth/logged_out".into(),
            Self::Reset(slice) => format!("{slice}/reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_increase() {
        let a = RequestId::next();
        let b = RequestId::next();
        assert!(b > a);
    }

    #[test]
    fn describe_names_slice_op_and_phase() {
        let request = RequestId::next();
        let action = Action::Fulfilled {
            slice: SliceKey::Pets,
            op: "fetch_all",
            request,
            payload: Payload::Replace(Vec::new()),
        };
        assert_eq!(
            action.describe(),
            format!("pets/fetch_all/fulfilled {request} (replace)")
        );
        assert_eq!(action.slice(), Some(SliceKey::Pets));
        assert_eq!(Action::Auth(AuthAction::LoggedOut).slice(), None);
    }
}
