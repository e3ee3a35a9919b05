// ── Dispatch middleware ──
//
// Hooks that run around every reduction, in installation order. Errors
// returned from a hook abort the dispatch and reach the caller.

use tracing::debug;

use super::action::Action;
use super::state::RootState;
use crate::error::CoreError;

/// Cross-cutting behavior wrapped around the reducer.
pub trait Middleware: Send + Sync {
    /// Runs before the action is reduced.
    fn before(&self, _action: &Action) -> Result<(), CoreError> {
        Ok(())
    }

    /// Runs after a successful reduction with the committed tree.
    fn after(&self, _action: &Action, _state: &RootState) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Diagnostic logging of every dispatched action. Always installed first.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before(&self, action: &Action) -> Result<(), CoreError> {
        debug!(action = %action.describe(), "dispatch");
        Ok(())
    }

    fn after(&self, action: &Action, state: &RootState) -> Result<(), CoreError> {
        match action.slice() {
            Some(key) => {
                let slice = state.slice(key);
                debug!(
                    slice = %key,
                    status = %slice.status,
                    items = slice.items.len(),
                    "reduced"
                );
            }
            None => debug!(
                status = %state.auth.status,
                authenticated = state.auth.is_authenticated(),
                "reduced auth"
            ),
        }
        Ok(())
    }
}
