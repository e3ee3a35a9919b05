mod action;
mod container;
mod failure;
mod middleware;
mod reducer;
mod state;

pub use action::{Action, AuthAction, Payload, RequestId};
pub use container::Store;
pub use failure::{FailureKind, FailurePayload};
pub use middleware::{LoggingMiddleware, Middleware};
pub use reducer::reduce;
pub use state::{AuthState, RootState, Slice, SliceKey, Status};
