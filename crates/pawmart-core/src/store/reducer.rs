// ── Root reducer ──
//
// Pure, synchronous state transitions. The container runs this against a
// copy of the current tree and only commits on success, so an `Err` leaves
// the tree exactly as it was.

use strum::IntoEnumIterator;

use super::action::{Action, AuthAction, Payload};
use super::state::{AuthState, RootState, Slice, SliceKey, Status};
use crate::error::CoreError;

/// Apply one action to the state tree.
pub fn reduce(state: &mut RootState, action: &Action) -> Result<(), CoreError> {
    match action {
        Action::Pending { slice, .. } => {
            begin(state.slice_mut(*slice));
            Ok(())
        }
        Action::Fulfilled { slice, payload, .. } => fulfill(state.slice_mut(*slice), *slice, payload),
        Action::Rejected { slice, error, .. } => {
            let target = state.slice_mut(*slice);
            target.status = Status::Failed;
            target.error = Some(error.clone());
            Ok(())
        }
        Action::Auth(auth) => {
            reduce_auth(state, auth);
            Ok(())
        }
        Action::Reset(slice) => {
            *state.slice_mut(*slice) = Slice::default();
            Ok(())
        }
    }
}

fn begin(slice: &mut Slice) {
    slice.status = Status::Loading;
    slice.error = None;
}

fn fulfill(slice: &mut Slice, key: SliceKey, payload: &Payload) -> Result<(), CoreError> {
    if key.is_singleton()
        && !matches!(payload, Payload::Select(_) | Payload::Clear | Payload::Nothing)
    {
        return Err(CoreError::Reducer {
            slice: key.to_string(),
            reason: format!("singleton slice cannot merge {payload:?}"),
        });
    }

    let id_field = key.id_field();
    match payload {
        Payload::Replace(items) => slice.items.clone_from(items),
        Payload::Select(record) => slice.selected.clone_from(record),
        Payload::Append(record) => slice.items.push(record.clone()),
        Payload::ReplaceById { id, record } => {
            if let Some(existing) = slice.items.iter_mut().find(|r| r.has_id(id_field, id)) {
                existing.clone_from(record);
            }
            if slice.selected.as_ref().is_some_and(|r| r.has_id(id_field, id)) {
                slice.selected = Some(record.clone());
            }
        }
        Payload::RemoveById(id) => {
            slice.items.retain(|r| !r.has_id(id_field, id));
            if slice.selected.as_ref().is_some_and(|r| r.has_id(id_field, id)) {
                slice.selected = None;
            }
        }
        Payload::Clear => {
            slice.items.clear();
            slice.selected = None;
        }
        Payload::Nothing => {}
    }

    slice.status = Status::Succeeded;
    slice.error = None;
    Ok(())
}

fn reduce_auth(state: &mut RootState, action: &AuthAction) {
    match action {
        AuthAction::Pending { .. } => {
            state.auth.status = Status::Loading;
            state.auth.error = None;
        }
        AuthAction::LoggedIn { session, .. } => {
            state.auth.status = Status::Succeeded;
            state.auth.error = None;
            state.auth.session = Some(session.clone());
        }
        AuthAction::Settled { .. } => {
            state.auth.status = Status::Succeeded;
            state.auth.error = None;
        }
        AuthAction::Rejected { error, .. } => {
            state.auth.status = Status::Failed;
            state.auth.error = Some(error.clone());
        }
        AuthAction::LoggedOut => {
            state.auth = AuthState::default();
            for key in SliceKey::iter().filter(|k| k.is_session_scoped()) {
                *state.slice_mut(key) = Slice::default();
            }
        }
    }
}
