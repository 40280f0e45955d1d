//! Confirming a pending delete from the list modal.

use std::future::Future;

use client_core::ClientResult;
use shared::error::ErrorCode;
use tracing::{info, warn};

use crate::store::{FormState, PendingDelete};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(ErrorCode),
    NothingPending,
}

/// Deletes the pending entity and closes the modal whatever the result.
///
/// A failed delete is logged and reported but not published to the store; the
/// caller refetches the list either way.
pub async fn confirm_delete<X, F, Fut>(store: &mut FormState<X>, delete: F) -> DeleteOutcome
where
    X: PendingDelete,
    F: FnOnce(X::Id) -> Fut,
    Fut: Future<Output = ClientResult<()>>,
{
    let Some(id) = store.pending_delete_id().cloned() else {
        return DeleteOutcome::NothingPending;
    };

    let outcome = match delete(id.clone()).await {
        Ok(()) => {
            info!(id = ?id, "entity deleted");
            DeleteOutcome::Deleted
        }
        Err(err) => {
            warn!(id = ?id, error = %err, "delete failed");
            DeleteOutcome::Failed(err.code())
        }
    };
    store.close_delete_modal();
    outcome
}

pub fn cancel_delete<X: PendingDelete>(store: &mut FormState<X>) {
    store.close_delete_modal();
}
