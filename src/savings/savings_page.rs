//! The page for recording savings balances and the girls' allowances.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    form::{fields_with_prefix, parse_amount},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_INLINE_INPUT_STYLE, FORM_LABEL_STYLE,
        PAGE_CONTAINER_STYLE, base, euro_input_styles, format_currency,
    },
    navigation::NavBar,
    savings::core::{SavingsItem, get_savings_items, update_savings_amount},
    settings::{SettingKey, Settings, get_settings, set_setting},
};

/// The state needed for the savings page and endpoint.
#[derive(Debug, Clone)]
pub struct SavingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the savings page.
pub async fn get_savings_page(State(state): State<SavingsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_savings_items(&connection)
        .inspect_err(|error| tracing::error!("could not get savings: {error}"))?;
    let settings = get_settings(&connection)
        .inspect_err(|error| tracing::error!("could not get settings: {error}"))?;

    Ok(savings_view(&items, &settings).into_response())
}

/// Saves the savings page, redirects back to it on success.
///
/// `saving_{id}` fields set the amount of each savings item, where blank means zero.
/// The allowance fields are only saved when they are not blank.
pub async fn update_savings_endpoint(
    State(state): State<SavingsState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match parse_savings_form(&form).and_then(|update| update_savings(&update, &connection)) {
        Ok(()) => (
            HxRedirect(endpoints::SAVINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update savings: {error}");
            error.into_alert_response()
        }
    }
}

#[derive(Debug, PartialEq)]
struct SavingsUpdate {
    amounts: Vec<(DatabaseId, f64)>,
    girls_shachar: Option<f64>,
    girls_yaara: Option<f64>,
}

fn parse_savings_form(form: &HashMap<String, String>) -> Result<SavingsUpdate, Error> {
    let amounts = fields_with_prefix(form, "saving_")
        .into_iter()
        .map(|(id, raw)| Ok((id, parse_amount(raw)?.unwrap_or(0.0))))
        .collect::<Result<_, Error>>()?;

    let allowance = |key: SettingKey| match form.get(key.as_str()) {
        Some(raw) => parse_amount(raw),
        None => Ok(None),
    };

    Ok(SavingsUpdate {
        amounts,
        girls_shachar: allowance(SettingKey::GirlsShachar)?,
        girls_yaara: allowance(SettingKey::GirlsYaara)?,
    })
}

/// Write the savings page in one transaction.
///
/// The savings kept in the checking account are also the savings to exclude
/// from the spendable money, so that setting follows the checking item.
fn update_savings(update: &SavingsUpdate, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    for &(id, amount) in &update.amounts {
        match update_savings_amount(id, amount, &transaction)? {
            Some(item) if item.is_checking => {
                set_setting(SettingKey::SavingsIgnore, amount, &transaction)?
            }
            Some(_) => {}
            None => tracing::warn!("Skipping savings item {id} that is not in the database"),
        }
    }

    if let Some(amount) = update.girls_shachar {
        set_setting(SettingKey::GirlsShachar, amount, &transaction)?;
    }

    if let Some(amount) = update.girls_yaara {
        set_setting(SettingKey::GirlsYaara, amount, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

fn savings_view(items: &[SavingsItem], settings: &Settings) -> Markup {
    let nav_bar = NavBar::new(endpoints::SAVINGS_VIEW).into_html();
    let total: f64 = items.iter().map(|item| item.amount).sum();

    let allowance_input = |key: SettingKey, label: &str, value: f64| {
        html!(
            div class="flex items-center justify-between gap-3"
            {
                label for=(key.as_str()) class=(FORM_LABEL_STYLE) { (label) }

                div class="input-wrapper"
                {
                    input
                        id=(key.as_str())
                        type="number"
                        step="0.01"
                        name=(key.as_str())
                        value=(value)
                        class=(FORM_INLINE_INPUT_STYLE);
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::SAVINGS_API)
                hx-target-error="#alert-container"
                class="space-y-6 w-full max-w-md"
            {
                section class="space-y-2"
                {
                    h1 class="text-xl font-bold" { "Savings" }

                    ul class="space-y-2"
                    {
                        @for item in items {
                            li class=(CARD_STYLE)
                            {
                                div class="flex items-center justify-between gap-3"
                                {
                                    label
                                        for=(format!("saving_{}", item.id))
                                        dir="rtl"
                                        class="text-sm font-medium text-gray-900 dark:text-white"
                                    {
                                        (item.name)

                                        @if item.is_checking {
                                            span class="ms-2 text-xs text-gray-500 dark:text-gray-400"
                                            { "(excluded from spending)" }
                                        }
                                    }

                                    div class="input-wrapper"
                                    {
                                        input
                                            id=(format!("saving_{}", item.id))
                                            type="number"
                                            step="0.01"
                                            name=(format!("saving_{}", item.id))
                                            value=(item.amount)
                                            class=(FORM_INLINE_INPUT_STYLE);
                                    }
                                }
                            }
                        }
                    }

                    p class="flex justify-between px-4 text-sm font-semibold"
                    {
                        span { "Total" }
                        span data-savings-total="true" { (format_currency(total)) }
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Girls' Allowances" }

                    div class=(CARD_STYLE)
                    {
                        (allowance_input(SettingKey::GirlsShachar, "Shachar", settings.girls_shachar))
                        (allowance_input(SettingKey::GirlsYaara, "Yaara", settings.girls_yaara))
                    }

                    p class="flex justify-between px-4 text-sm font-semibold"
                    {
                        span { "Total" }
                        span { (format_currency(settings.girls_total())) }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Savings" }
            }
        }
    );

    base("Savings", &[euro_input_styles()], &content)
}
