//! The page for editing the recurring template and the endpoint that saves it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    form::{parse_amount, parse_debit_day},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_INLINE_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_input_value, base, euro_input_styles,
    },
    navigation::NavBar,
    template::core::{
        TemplateItem, TemplateItemUpdate, get_template_items, update_template_items,
    },
};

/// The state needed for the template page and endpoint.
#[derive(Debug, Clone)]
pub struct TemplateState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TemplateState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the template editor.
pub async fn get_template_page(State(state): State<TemplateState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_template_items(&connection)
        .inspect_err(|error| tracing::error!("could not get template items: {error}"))?;

    Ok(template_view(&items).into_response())
}

/// Saves the template editor, responds with an alert.
///
/// Each row submits `amount_{id}` and `day_{id}`, where blank means "no value",
/// and `variable_{id}` only when its checkbox is ticked.
pub async fn update_template_endpoint(
    State(state): State<TemplateState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_template_items(&connection)
        .and_then(|items| parse_template_form(&form, &items))
        .and_then(|updates| update_template_items(&updates, &connection));

    match result {
        Ok(()) => Alert::SuccessSimple {
            message: "Template saved".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not update template: {error}");
            error.into_alert_response()
        }
    }
}

/// Build one update per template item, keeping the stored value of any field
/// missing from the form.
fn parse_template_form(
    form: &HashMap<String, String>,
    items: &[TemplateItem],
) -> Result<Vec<TemplateItemUpdate>, Error> {
    items
        .iter()
        .map(|item| {
            let amount = match form.get(&format!("amount_{}", item.id)) {
                Some(raw) => parse_amount(raw)?,
                None => item.amount,
            };
            let debit_day = match form.get(&format!("day_{}", item.id)) {
                Some(raw) => parse_debit_day(raw)?,
                None => item.debit_day,
            };

            Ok(TemplateItemUpdate {
                id: item.id,
                amount,
                debit_day,
                is_variable: form.contains_key(&format!("variable_{}", item.id)),
            })
        })
        .collect()
}

fn template_view(items: &[TemplateItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TEMPLATE_VIEW).into_html();

    let row = |item: &TemplateItem| {
        let debit_day = item.debit_day.map(|day| day.to_string()).unwrap_or_default();

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    div dir="rtl" { (item.name) }
                    @if let Some(name_en) = &item.name_en {
                        div class="text-xs text-gray-500 dark:text-gray-400" { (name_en) }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if item.is_canteen {
                        span class="text-xs text-gray-500 dark:text-gray-400"
                        { "Calculated at month reset" }
                    } @else {
                        div class="input-wrapper"
                        {
                            input
                                type="number"
                                step="0.01"
                                name=(format!("amount_{}", item.id))
                                value=(amount_input_value(item.amount))
                                class=(FORM_INLINE_INPUT_STYLE);
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    input
                        type="number"
                        min="1"
                        max="31"
                        name=(format!("day_{}", item.id))
                        value=(debit_day)
                        class="w-16 p-1.5 rounded text-sm text-right text-gray-900
                            dark:text-white bg-gray-50 dark:bg-gray-700 border
                            border-gray-300 dark:border-gray-600";
                }

                td class=(TABLE_CELL_STYLE)
                {
                    input
                        type="checkbox"
                        name=(format!("variable_{}", item.id))
                        checked[item.is_variable]
                        disabled[item.is_canteen];
                }
            }
        )
    };

    let section = |title: &str, items: Vec<&TemplateItem>| {
        html!(
            tbody
            {
                tr class="bg-gray-100 dark:bg-gray-900"
                {
                    th colspan="4" scope="colgroup" class="px-6 py-2 text-left font-semibold"
                    { (title) }
                }

                @for item in items {
                    (row(item))
                }
            }
        )
    };

    let (income, expenses): (Vec<_>, Vec<_>) = items.iter().partition(|item| item.is_income);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl"
            {
                h1 class="text-xl font-bold" { "Recurring Template" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Changes apply from the next month reset. Tick \"Variable\" for amounts
                    you want to enter by hand each month."
                }

                form
                    hx-post=(endpoints::TEMPLATE_API)
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div class="overflow-x-auto"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Debit day" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Variable" }
                                }
                            }

                            (section("Income", income))
                            (section("Expenses", expenses))
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Template" }
                }
            }
        }
    );

    base("Template", &[euro_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        Error, endpoints, initialize_db,
        template::{core::get_template_items, template_page::parse_template_form},
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{TemplateState, get_template_page, update_template_endpoint};

    fn get_test_state() -> TemplateState {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialise database");

        TemplateState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_every_template_item() {
        let state = get_test_state();

        let response = get_template_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TEMPLATE_API, "hx-post");
        let day_inputs = form
            .select(&Selector::parse("input[name^='day_']").unwrap())
            .count();
        assert_eq!(day_inputs, 15);
        // The canteen amount is computed, so it has no amount input.
        let amount_inputs = form
            .select(&Selector::parse("input[name^='amount_']").unwrap())
            .count();
        assert_eq!(amount_inputs, 14);
    }

    #[tokio::test]
    async fn saves_amounts_days_and_variable_flags() {
        let state = get_test_state();
        let rent = {
            let connection = state.db_connection.lock().unwrap();
            get_template_items(&connection).unwrap()[6].clone()
        };
        let form = HashMap::from([
            (format!("amount_{}", rent.id), "1700".to_owned()),
            (format!("day_{}", rent.id), "".to_owned()),
            (format!("variable_{}", rent.id), "on".to_owned()),
        ]);

        let response = update_template_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        let items = get_template_items(&connection).unwrap();
        assert_eq!(items[6].amount, Some(1700.0));
        assert_eq!(items[6].debit_day, None);
        assert!(items[6].is_variable);
        // Unticked boxes are not submitted, so every other item is no longer variable.
        assert!(items.iter().filter(|item| item.is_variable).count() == 1);
    }

    #[test]
    fn blank_amount_clears_it() {
        let state = get_test_state();
        let connection = state.db_connection.lock().unwrap();
        let items = get_template_items(&connection).unwrap();
        let form = HashMap::from([(format!("amount_{}", items[1].id), " ".to_owned())]);

        let updates = parse_template_form(&form, &items).unwrap();

        assert_eq!(updates[1].amount, None);
        assert_eq!(updates[2].amount, items[2].amount);
    }

    #[test]
    fn rejects_invalid_debit_day() {
        let state = get_test_state();
        let connection = state.db_connection.lock().unwrap();
        let items = get_template_items(&connection).unwrap();
        let form = HashMap::from([(format!("day_{}", items[0].id), "40".to_owned())]);

        let result = parse_template_form(&form, &items);

        assert_eq!(result, Err(Error::InvalidDebitDay("40".to_owned())));
    }

    #[tokio::test]
    async fn invalid_amount_is_bad_request() {
        let state = get_test_state();
        let first_id = {
            let connection = state.db_connection.lock().unwrap();
            get_template_items(&connection).unwrap()[0].id
        };
        let form = HashMap::from([(format!("amount_{first_id}"), "a lot".to_owned())]);

        let response = update_template_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
