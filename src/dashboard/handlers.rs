//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    calendar::calculate_days_until_25,
    dashboard::{
        cards::{ProjectionSummary, balance_card, projection_card, reset_due_banner},
        tables::ledger_table,
    },
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, euro_input_styles},
    ledger::{Ledger, get_ledger},
    navigation::NavBar,
    pending::{PendingTransaction, get_pending_transactions, pending_form, pending_list},
    projection::{compute_per_day, compute_remaining},
    settings::{Settings, get_settings},
    timezone::get_local_date,
};

/// The day of the month from which the dashboard suggests a month reset.
const RESET_DUE_DAY: u8 = 24;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the ledger and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
#[derive(Debug, PartialEq)]
struct DashboardData {
    settings: Settings,
    ledger: Ledger,
    pending: Vec<PendingTransaction>,
    summary: ProjectionSummary,
    is_reset_due: bool,
}

/// Display the projection together with the current month's ledger.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(today, &connection)
        .inspect_err(|error| tracing::error!("could not build dashboard: {error}"))?;

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(today: Date, connection: &Connection) -> Result<DashboardData, Error> {
    let settings = get_settings(connection)?;
    let ledger = get_ledger(connection)?;
    let pending = get_pending_transactions(connection)?;

    let remaining = compute_remaining(
        &settings.account_figures(),
        &ledger.income,
        &ledger.expenses,
        &pending,
    );
    let days_until_cutoff = calculate_days_until_25(today)?;

    Ok(DashboardData {
        settings,
        ledger,
        pending,
        summary: ProjectionSummary {
            remaining,
            days_until_cutoff,
            per_day: compute_per_day(remaining, days_until_cutoff),
        },
        is_reset_due: today.day() >= RESET_DUE_DAY,
    })
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-6"
            {
                @if data.is_reset_due {
                    (reset_due_banner())
                }

                (projection_card(&data.summary))

                div class="grid gap-6 lg:grid-cols-2"
                {
                    (balance_card(&data.settings))

                    section class="space-y-2"
                    {
                        h2 class="text-lg font-semibold" { "Pending" }

                        div class=(CARD_STYLE)
                        {
                            (pending_form(false))
                        }

                        (pending_list(&data.pending))
                    }
                }

                (ledger_table("Income", "income", &data.ledger.income))
                (ledger_table("Expenses", "expenses", &data.ledger.expenses))
            }
        }
    );

    base("Dashboard", &[euro_input_styles()], &content)
}
