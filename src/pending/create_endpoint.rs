//! Defines the endpoint for logging a pending transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints, form::parse_amount, pending::core::create_pending_transaction,
};

/// The state needed to create a pending transaction.
#[derive(Debug, Clone)]
pub struct CreatePendingState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePendingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for a new pending transaction.
#[derive(Debug, Default, Deserialize)]
pub struct PendingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: String,
    /// Set by the pending page so that the user stays there after adding.
    #[serde(default)]
    pub return_to_pending: bool,
}

/// A route handler for adding a pending transaction.
///
/// Redirects to the pending page when the form came from there, otherwise to the dashboard.
pub async fn create_pending_endpoint(
    State(state): State<CreatePendingState>,
    Form(form): Form<PendingForm>,
) -> Response {
    let amount = match parse_amount(&form.amount) {
        Ok(Some(amount)) => amount,
        Ok(None) => return Error::IncompletePendingTransaction.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_pending_transaction(&form.name, amount, OffsetDateTime::now_utc(), &connection) {
        Ok(_) => {
            let redirect_url = if form.return_to_pending {
                endpoints::PENDING_VIEW
            } else {
                endpoints::DASHBOARD_VIEW
            };

            (HxRedirect(redirect_url.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create pending transaction from {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        endpoints, initialize_db, pending::core::get_pending_transactions,
        test_utils::assert_hx_redirect,
    };

    use super::{CreatePendingState, PendingForm, create_pending_endpoint};

    fn get_test_state() -> CreatePendingState {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialise database");

        CreatePendingState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn creates_and_redirects_to_dashboard() {
        let state = get_test_state();
        let form = PendingForm {
            name: "Groceries".to_owned(),
            amount: "54.20".to_owned(),
            return_to_pending: false,
        };

        let response = create_pending_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let pending = get_pending_transactions(&connection).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Groceries");
        assert_eq!(pending[0].amount, 54.2);
    }

    #[tokio::test]
    async fn redirects_back_to_pending_page() {
        let state = get_test_state();
        let form = PendingForm {
            name: "Bakery".to_owned(),
            amount: "4".to_owned(),
            return_to_pending: true,
        };

        let response = create_pending_endpoint(State(state), Form(form)).await;

        assert_hx_redirect(&response, endpoints::PENDING_VIEW);
    }

    #[tokio::test]
    async fn name_and_amount_are_required() {
        for (name, amount) in [("", "10"), ("Bakery", ""), ("  ", "  ")] {
            let state = get_test_state();
            let form = PendingForm {
                name: name.to_owned(),
                amount: amount.to_owned(),
                return_to_pending: false,
            };

            let response = create_pending_endpoint(State(state.clone()), Form(form)).await;

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "want bad request for name {name:?} and amount {amount:?}"
            );
            let connection = state.db_connection.lock().unwrap();
            assert_eq!(get_pending_transactions(&connection), Ok(vec![]));
        }
    }

    #[tokio::test]
    async fn invalid_amount_is_bad_request() {
        let state = get_test_state();
        let form = PendingForm {
            name: "Bakery".to_owned(),
            amount: "four".to_owned(),
            return_to_pending: false,
        };

        let response = create_pending_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
