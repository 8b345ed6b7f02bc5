//! Defines the endpoint for deleting a pending transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::DatabaseId, pending::core::delete_pending_transaction,
};

/// The state needed to delete a pending transaction.
#[derive(Debug, Clone)]
pub struct DeletePendingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePendingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a pending transaction.
///
/// Responds by asking HTMX to refresh the page so that the totals and the
/// remaining money are recalculated.
pub async fn delete_pending_endpoint(
    State(state): State<DeletePendingState>,
    Path(pending_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_pending_transaction(pending_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (HxRefresh(true), StatusCode::OK).into_response(),
        Ok(_) => Error::DeleteMissingPendingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete pending transaction {pending_id}: {error}");
            error.into_alert_response()
        }
    }
}
