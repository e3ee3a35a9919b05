// ── Operation runner ──
//
// The three-phase lifecycle shared by every store: dispatch Pending, issue
// one gateway request, dispatch Fulfilled or Rejected, publish the event.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use pawmart_api::{Body, Endpoints, Gateway, Method};

use super::Outcome;
use crate::error::CoreError;
use crate::model::Record;
use crate::notify::{Notifier, NotifyPolicy, OperationEvent, Scope};
use crate::store::{Action, FailureKind, FailurePayload, Payload, RequestId, SliceKey, Store};

/// Everything an operation needs, shared by all stores of one client.
pub(crate) struct Context {
    pub(crate) gateway: Gateway,
    pub(crate) endpoints: Endpoints,
    pub(crate) store: Arc<Store>,
    pub(crate) notifier: Notifier,
}

/// One remote call and how its result is announced.
pub(crate) struct Request {
    pub(crate) op: &'static str,
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) body: Body,
    pub(crate) policy: NotifyPolicy,
}

impl Request {
    pub(crate) fn get(op: &'static str, url: Url) -> Self {
        Self {
            op,
            method: Method::GET,
            url,
            body: Body::Empty,
            policy: NotifyPolicy::FAILURES,
        }
    }

    pub(crate) fn new(op: &'static str, method: Method, url: Url, body: impl Into<Body>) -> Self {
        Self {
            op,
            method,
            url,
            body: body.into(),
            policy: NotifyPolicy::FAILURES,
        }
    }

    pub(crate) fn announce(mut self, policy: NotifyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Context {
    /// Pending transition for `slice`.
    pub(crate) fn begin(&self, slice: SliceKey, op: &'static str) -> Result<RequestId, CoreError> {
        let request = RequestId::next();
        self.store.dispatch(Action::Pending { slice, op, request })?;
        Ok(request)
    }

    /// Issue the remote call, normalizing every failure.
    pub(crate) async fn call(
        &self,
        method: Method,
        url: Url,
        body: Body,
    ) -> Result<Value, FailurePayload> {
        match self.gateway.send(method, url, body).await {
            Ok(response) => Ok(response.data),
            Err(e) => {
                debug!(error = %e, network = e.is_network(), "request failed");
                Err(FailurePayload::from(&e))
            }
        }
    }

    /// Success or failure transition for `slice`.
    pub(crate) fn settle(
        &self,
        slice: SliceKey,
        op: &'static str,
        request: RequestId,
        result: Result<Payload, FailurePayload>,
    ) -> Result<(), CoreError> {
        match result {
            Ok(payload) => self.store.dispatch(Action::Fulfilled {
                slice,
                op,
                request,
                payload,
            }),
            Err(error) => self.store.dispatch(Action::Rejected {
                slice,
                op,
                request,
                error,
            }),
        }
    }

    /// Settle `slice`, never leaving it in the pending phase. When the
    /// success or failure transition cannot be applied, the slice is
    /// marked failed with the dispatch error and that error is returned.
    pub(crate) fn finish(
        &self,
        slice: SliceKey,
        op: &'static str,
        request: RequestId,
        result: Result<Payload, FailurePayload>,
    ) -> Result<(), CoreError> {
        let Err(err) = self.settle(slice, op, request, result) else {
            return Ok(());
        };
        if self.store.snapshot().slice(slice).is_loading() {
            let failure = FailurePayload::new(FailureKind::Client, err.to_string());
            if let Err(e) = self.settle(slice, op, request, Err(failure)) {
                warn!(slice = %slice, op, error = %e, "could not settle slice after dispatch failure");
            }
        }
        Err(err)
    }

    pub(crate) fn publish(
        &self,
        scope: Scope,
        op: &'static str,
        request: RequestId,
        result: Result<(), FailurePayload>,
        policy: NotifyPolicy,
    ) {
        self.notifier.publish(OperationEvent {
            scope,
            op,
            request,
            result,
            policy,
            at: Utc::now(),
        });
    }

    /// Run one operation against `slice`.
    ///
    /// `interpret` turns the response body into the merge payload and the
    /// value handed back to the caller. Remote failures resolve to
    /// `Outcome::Rejected`; only dispatch failures are errors, and even
    /// then the slice ends up failed rather than pending.
    pub(crate) async fn run<T>(
        &self,
        slice: SliceKey,
        request: Request,
        interpret: impl FnOnce(Value) -> (Payload, T),
    ) -> Result<Outcome<T>, CoreError> {
        let Request {
            op,
            method,
            url,
            body,
            policy,
        } = request;

        let request = self.begin(slice, op)?;
        debug!(slice = %slice, op, request_id = request.get(), %method, %url, "operation started");

        let (result, outcome) = match self.call(method, url, body).await {
            Ok(data) => {
                let (payload, value) = interpret(data);
                (Ok(payload), Outcome::Fulfilled(value))
            }
            Err(failure) => (Err(failure.clone()), Outcome::Rejected(failure)),
        };

        let event = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish(slice, op, request, result)?;
        self.publish(Scope::Slice(slice), op, request, event, policy);
        Ok(outcome)
    }
}

// ── Response unwrapping ─────────────────────────────────────────────

/// Records of a list response. Accepts a bare array or an object holding
/// one under `wrapper`, `data` or `items`; anything else is an empty
/// collection. Non-object entries are skipped.
pub(crate) fn unwrap_list(data: Value, wrapper: &str) -> Vec<Record> {
    let array = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => [wrapper, "data", "items"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    array.into_iter().filter_map(Record::from_value).collect()
}

/// Record of a single-entity response, unwrapping `wrapper` or `data`
/// when present.
pub(crate) fn unwrap_single(data: Value, wrapper: &str) -> Option<Record> {
    match data {
        Value::Object(mut map) => {
            for key in [wrapper, "data"] {
                if matches!(map.get(key), Some(Value::Object(_))) {
                    return map.remove(key).and_then(Record::from_value);
                }
            }
            Some(Record::from(map))
        }
        _ => None,
    }
}
