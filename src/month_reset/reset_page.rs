//! The page for starting a new month and the endpoint that performs the reset.

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
use time::{Date, Month};

use crate::{
    AppState, Error,
    calendar::{calculate_girls_food, canteen_cost, count_canteen_days},
    endpoints,
    form::{fields_with_prefix, parse_amount},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_INLINE_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        amount_input_value, base, euro_input_styles, format_currency,
    },
    month_reset::core::{MonthReset, reset_month},
    navigation::NavBar,
    template::{TemplateItem, get_template_items},
    timezone::get_local_date,
};

/// The state needed for the month reset page and endpoint.
#[derive(Debug, Clone)]
pub struct MonthResetState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MonthResetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// This month's canteen figures shown before resetting.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanteenPreview {
    year: i32,
    month: Month,
    school_days: u8,
    cost: f64,
}

impl CanteenPreview {
    fn for_date(today: Date) -> Result<Self, Error> {
        let school_days = count_canteen_days(today.year(), today.month())?;

        Ok(Self {
            year: today.year(),
            month: today.month(),
            school_days,
            cost: canteen_cost(school_days),
        })
    }
}

/// Renders the month reset page.
pub async fn get_month_reset_page(State(state): State<MonthResetState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let canteen = CanteenPreview::for_date(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let template = get_template_items(&connection)
        .inspect_err(|error| tracing::error!("could not get template items: {error}"))?;

    Ok(month_reset_view(&canteen, &template).into_response())
}

/// Resets the month, redirects to the dashboard on success.
///
/// The form submits `var_{id}` for each variable template item, where blank
/// keeps the template amount, and `clear_pending` when its checkbox is ticked.
pub async fn reset_month_endpoint(
    State(state): State<MonthResetState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let reset = match parse_reset_form(&form, today) {
        Ok(reset) => reset,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match reset_month(&reset, &connection) {
        Ok(()) => {
            tracing::info!(
                "Reset the month for {} {} with a canteen cost of {}",
                today.month(),
                today.year(),
                format_currency(reset.canteen_cost)
            );

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not reset the month: {error}");
            error.into_alert_response()
        }
    }
}

fn parse_reset_form(form: &HashMap<String, String>, today: Date) -> Result<MonthReset, Error> {
    let mut variable_amounts = HashMap::new();

    for (id, raw) in fields_with_prefix(form, "var_") {
        if let Some(amount) = parse_amount(raw)? {
            variable_amounts.insert(id, amount);
        }
    }

    Ok(MonthReset {
        canteen_cost: calculate_girls_food(today.year(), today.month())?,
        variable_amounts,
        clear_pending: form.contains_key("clear_pending"),
    })
}

fn month_reset_view(canteen: &CanteenPreview, template: &[TemplateItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MONTH_RESET_VIEW).into_html();
    let variable_items: Vec<_> = template
        .iter()
        .filter(|item| item.is_variable && !item.is_canteen)
        .collect();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::MONTH_RESET_API)
                hx-confirm="Start a new month? This replaces the current ledger."
                hx-target-error="#alert-container"
                class="space-y-6 w-full max-w-md"
            {
                h1 class="text-xl font-bold"
                {
                    "Month Reset: " (canteen.month) " " (canteen.year)
                }

                section class=(CARD_STYLE) data-canteen-preview="true"
                {
                    h2 class="text-sm font-semibold" { "Girls' school food" }

                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        (canteen.school_days) " canteen days this month"
                    }

                    p class="text-lg font-bold tabular-nums" data-canteen-cost="true"
                    {
                        (format_currency(canteen.cost))
                    }
                }

                @if !variable_items.is_empty() {
                    section class="space-y-2"
                    {
                        h2 class="text-lg font-semibold" { "Variable amounts" }

                        p class="text-sm text-gray-600 dark:text-gray-400"
                        { "Leave blank to keep the template amount." }

                        ul class="space-y-2"
                        {
                            @for item in &variable_items {
                                li class=(CARD_STYLE)
                                {
                                    div class="flex items-center justify-between gap-3"
                                    {
                                        label
                                            for=(format!("var_{}", item.id))
                                            class="text-sm font-medium text-gray-900 dark:text-white"
                                        {
                                            div dir="rtl" { (item.name) }
                                            @if let Some(name_en) = &item.name_en {
                                                div class="text-xs text-gray-500 dark:text-gray-400"
                                                { (name_en) }
                                            }
                                        }

                                        div class="input-wrapper"
                                        {
                                            input
                                                id=(format!("var_{}", item.id))
                                                type="number"
                                                step="0.01"
                                                name=(format!("var_{}", item.id))
                                                placeholder=(amount_input_value(item.amount))
                                                class=(FORM_INLINE_INPUT_STYLE);
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                label class="flex items-center gap-2 text-sm"
                {
                    input type="checkbox" name="clear_pending" value="on";
                    "Also clear pending transactions"
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Start New Month" }
            }
        }
    );

    base("Month Reset", &[euro_input_styles()], &content)
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
    use time::{Date, Month, macros::date};

    use crate::{
        Error,
        calendar::calculate_girls_food,
        endpoints,
        html::format_currency,
        initialize_db,
        ledger::get_ledger,
        template::get_template_items,
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_hx_redirect, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{
        CanteenPreview, MonthResetState, get_month_reset_page, month_reset_view, parse_reset_form,
        reset_month_endpoint,
    };

    fn get_test_state() -> MonthResetState {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialise database");

        MonthResetState {
            local_timezone: "Europe/Paris".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[test]
    fn previews_canteen_cost() {
        let preview = CanteenPreview::for_date(date!(2025 - 10 - 20)).unwrap();

        assert_eq!(
            preview,
            CanteenPreview {
                year: 2025,
                month: Month::October,
                school_days: 10,
                cost: 102.0,
            }
        );
    }

    #[test]
    fn preview_cost_matches_reset_cost() {
        for month in 1..=12 {
            let today = Date::from_calendar_date(2026, Month::try_from(month).unwrap(), 10).unwrap();

            let preview = CanteenPreview::for_date(today).unwrap();

            assert_eq!(
                Ok(preview.cost),
                calculate_girls_food(today.year(), today.month()),
                "canteen cost differs for {today}"
            );
        }
    }

    #[test]
    fn lists_variable_items_except_canteen() {
        let state = get_test_state();
        let template = {
            let connection = state.db_connection.lock().unwrap();
            get_template_items(&connection).unwrap()
        };
        let preview = CanteenPreview::for_date(date!(2025 - 11 - 24)).unwrap();

        let html = scraper::Html::parse_document(&month_reset_view(&preview, &template).into_string());

        assert_valid_html(&html);
        let want_count = template
            .iter()
            .filter(|item| item.is_variable && !item.is_canteen)
            .count();
        let got_count = html
            .select(&Selector::parse("input[name^='var_']").unwrap())
            .count();
        assert_eq!(got_count, want_count);
        let cost = html
            .select(&Selector::parse("[data-canteen-cost]").unwrap())
            .next()
            .expect("Could not find canteen cost")
            .text()
            .collect::<String>();
        assert_eq!(cost.trim(), format_currency(153.0));
    }

    #[tokio::test]
    async fn renders_page() {
        let state = get_test_state();

        let response = get_month_reset_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::MONTH_RESET_API, "hx-post");
    }

    #[test]
    fn parses_variable_amounts_and_clear_pending() {
        let form = HashMap::from([
            ("var_1".to_owned(), "3000".to_owned()),
            ("var_4".to_owned(), "".to_owned()),
            ("clear_pending".to_owned(), "on".to_owned()),
        ]);

        let reset = parse_reset_form(&form, date!(2025 - 10 - 25)).unwrap();

        assert_eq!(reset.variable_amounts, HashMap::from([(1, 3000.0)]));
        assert!(reset.clear_pending);
        assert_eq!(reset.canteen_cost, 102.0);
    }

    #[test]
    fn rejects_invalid_variable_amount() {
        let form = HashMap::from([("var_1".to_owned(), "?".to_owned())]);

        assert_eq!(
            parse_reset_form(&form, date!(2025 - 10 - 25)),
            Err(Error::InvalidAmount("?".to_owned()))
        );
    }

    #[tokio::test]
    async fn resets_and_redirects_to_dashboard() {
        let state = get_test_state();

        let response = reset_month_endpoint(State(state.clone()), Form(HashMap::new())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let ledger = get_ledger(&connection).unwrap();
        assert_eq!(ledger.income.len() + ledger.expenses.len(), 15);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let mut state = get_test_state();
        state.local_timezone = "Mars/Olympus_Mons".to_owned();

        let response = reset_month_endpoint(State(state), Form(HashMap::new())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
