//! Endpoints for clearing ledger items and correcting their amounts from the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    form::parse_amount,
    ledger::core::{set_cleared, update_ledger_amount},
};

/// The state needed to update a ledger item.
#[derive(Debug, Clone)]
pub struct LedgerItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LedgerItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for marking a ledger item as cleared, redirects to the dashboard on success.
pub async fn clear_ledger_item_endpoint(
    State(state): State<LedgerItemState>,
    Path(item_id): Path<DatabaseId>,
) -> Response {
    set_cleared_response(&state, item_id, true)
}

/// A route handler for marking a ledger item as not cleared, redirects to the dashboard on success.
pub async fn unclear_ledger_item_endpoint(
    State(state): State<LedgerItemState>,
    Path(item_id): Path<DatabaseId>,
) -> Response {
    set_cleared_response(&state, item_id, false)
}

fn set_cleared_response(state: &LedgerItemState, item_id: DatabaseId, is_cleared: bool) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_cleared(item_id, is_cleared, &connection) {
        Ok(()) => redirect_to_dashboard(),
        Err(error) => {
            tracing::error!("Could not set is_cleared={is_cleared} for ledger item {item_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// The form data for correcting a ledger item's amount.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerAmountForm {
    #[serde(default)]
    pub amount: String,
}

/// A route handler for changing the amount of a ledger item, redirects to the dashboard on success.
///
/// A blank amount leaves the item unchanged.
pub async fn update_ledger_amount_endpoint(
    State(state): State<LedgerItemState>,
    Path(item_id): Path<DatabaseId>,
    Form(form): Form<LedgerAmountForm>,
) -> Response {
    let amount = match parse_amount(&form.amount) {
        Ok(Some(amount)) => amount,
        Ok(None) => return redirect_to_dashboard(),
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_ledger_amount(item_id, amount, &connection) {
        Ok(()) => redirect_to_dashboard(),
        Err(error) => {
            tracing::error!("Could not update the amount of ledger item {item_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn redirect_to_dashboard() -> Response {
    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints, initialize_db,
        ledger::core::{NewLedgerItem, get_ledger, insert_ledger_item},
        test_utils::assert_hx_redirect,
    };

    use super::{
        LedgerAmountForm, LedgerItemState, clear_ledger_item_endpoint,
        unclear_ledger_item_endpoint, update_ledger_amount_endpoint,
    };

    fn get_test_state() -> (LedgerItemState, i64) {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialise database");
        insert_ledger_item(
            &NewLedgerItem {
                template_id: 1,
                name: "Rent",
                name_en: None,
                amount: Some(1683.0),
                debit_day: Some(28),
                is_income: false,
                is_variable: false,
                sort_order: 1,
            },
            &connection,
        )
        .expect("Could not insert ledger item");
        let id = get_ledger(&connection).unwrap().expenses[0].id;

        (
            LedgerItemState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            id,
        )
    }

    #[tokio::test]
    async fn clear_then_unclear() {
        let (state, id) = get_test_state();

        let response = clear_ledger_item_endpoint(State(state.clone()), Path(id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        {
            let connection = state.db_connection.lock().unwrap();
            assert!(get_ledger(&connection).unwrap().expenses[0].is_cleared);
        }

        let response = unclear_ledger_item_endpoint(State(state.clone()), Path(id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert!(!get_ledger(&connection).unwrap().expenses[0].is_cleared);
    }

    #[tokio::test]
    async fn clearing_missing_item_is_not_found() {
        let (state, id) = get_test_state();

        let response = clear_ledger_item_endpoint(State(state), Path(id + 100)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn updates_amount() {
        let (state, id) = get_test_state();

        let response = update_ledger_amount_endpoint(
            State(state.clone()),
            Path(id),
            Form(LedgerAmountForm {
                amount: "1700.5".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_ledger(&connection).unwrap().expenses[0].amount, Some(1700.5));
    }

    #[tokio::test]
    async fn blank_amount_is_ignored() {
        let (state, id) = get_test_state();

        let response = update_ledger_amount_endpoint(
            State(state.clone()),
            Path(id),
            Form(LedgerAmountForm::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_ledger(&connection).unwrap().expenses[0].amount, Some(1683.0));
    }

    #[tokio::test]
    async fn invalid_amount_is_bad_request() {
        let (state, id) = get_test_state();

        let response = update_ledger_amount_endpoint(
            State(state),
            Path(id),
            Form(LedgerAmountForm {
                amount: "12,50".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
