//! Defines the endpoint for updating the balance figures shown on the dashboard.
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

use crate::{
    AppState, Error, endpoints,
    form::parse_amount,
    settings::{SettingKey, set_setting},
};

/// The state needed to update the balance figures.
#[derive(Debug, Clone)]
pub struct UpdateBalanceState {
    /// The database connection for managing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for the balance figures.
///
/// Blank fields leave the stored value unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceForm {
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub future: String,
    #[serde(default)]
    pub savings_ignore: String,
}

/// A route handler for updating the balance figures, redirects to the dashboard on success.
pub async fn update_balance_endpoint(
    State(state): State<UpdateBalanceState>,
    Form(form): Form<BalanceForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_balance(&form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update balance with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// Parses every field before writing so a bad field leaves all settings untouched.
fn update_balance(form: &BalanceForm, connection: &Connection) -> Result<(), Error> {
    let updates = [
        (SettingKey::Balance, parse_amount(&form.balance)?),
        (SettingKey::Future, parse_amount(&form.future)?),
        (SettingKey::SavingsIgnore, parse_amount(&form.savings_ignore)?),
    ];

    for (key, value) in updates {
        if let Some(value) = value {
            set_setting(key, value, connection)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error, endpoints, initialize_db,
        settings::{SettingKey, get_setting},
        test_utils::assert_hx_redirect,
    };

    use super::{BalanceForm, UpdateBalanceState, update_balance, update_balance_endpoint};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection
    }

    #[tokio::test]
    async fn updates_non_empty_fields() {
        let state = UpdateBalanceState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let form = BalanceForm {
            balance: "1234.56".to_owned(),
            future: "".to_owned(),
            savings_ignore: "9000".to_owned(),
        };

        let response = update_balance_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_setting(SettingKey::Balance, &connection), Ok(1234.56));
        assert_eq!(get_setting(SettingKey::Future, &connection), Ok(0.0));
        assert_eq!(get_setting(SettingKey::SavingsIgnore, &connection), Ok(9000.0));
    }

    #[test]
    fn invalid_field_leaves_settings_untouched() {
        let connection = get_test_connection();
        let form = BalanceForm {
            balance: "100".to_owned(),
            future: "lots".to_owned(),
            savings_ignore: "".to_owned(),
        };

        let result = update_balance(&form, &connection);

        assert_eq!(result, Err(Error::InvalidAmount("lots".to_owned())));
        assert_eq!(get_setting(SettingKey::Balance, &connection), Ok(0.0));
    }

    #[tokio::test]
    async fn invalid_field_responds_with_bad_request() {
        let state = UpdateBalanceState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let form = BalanceForm {
            balance: "abc".to_owned(),
            ..Default::default()
        };

        let response = update_balance_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
