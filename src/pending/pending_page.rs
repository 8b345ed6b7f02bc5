//! The mobile-friendly page for logging purchases as they happen.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, euro_input_styles, format_currency,
    },
    navigation::NavBar,
    pending::core::{PendingTransaction, get_pending_transactions},
    projection::open_total,
};

/// The state needed for the pending page.
#[derive(Debug, Clone)]
pub struct PendingPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PendingPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the pending transactions page.
pub async fn get_pending_page(State(state): State<PendingPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let pending = get_pending_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get pending transactions: {error}"))?;

    Ok(pending_view(&pending).into_response())
}

fn pending_view(pending: &[PendingTransaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PENDING_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full max-w-md"
            {
                h1 class="text-xl font-bold" { "Pending Transactions" }

                div class=(CARD_STYLE)
                {
                    (pending_form(true))
                }

                (pending_list(pending))
            }
        }
    );

    base("Pending", &[euro_input_styles()], &content)
}

/// The form for adding a pending transaction.
///
/// Set `return_to_pending` when the form is shown on the pending page.
pub fn pending_form(return_to_pending: bool) -> Markup {
    html!(
        form
            hx-post=(endpoints::PENDING_API)
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            @if return_to_pending {
                input type="hidden" name="return_to_pending" value="true";
            }

            div
            {
                label for="pending-name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="pending-name"
                    type="text"
                    name="name"
                    placeholder="Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="pending-amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        id="pending-amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        inputmode="decimal"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Pending" }
        }
    )
}

/// The pending transactions with a delete button each, followed by their total.
pub fn pending_list(pending: &[PendingTransaction]) -> Markup {
    html!(
        section class="space-y-2"
        {
            ul class="space-y-2"
            {
                @for transaction in pending {
                    li class=(CARD_STYLE) data-pending-id=(transaction.id)
                    {
                        div class="flex items-center justify-between gap-3"
                        {
                            span class="text-sm font-medium text-gray-900 dark:text-white"
                            { (transaction.name) }

                            div class="flex items-center gap-3"
                            {
                                span class="text-sm tabular-nums" { (format_currency(transaction.amount)) }

                                button
                                    type="button"
                                    hx-delete=(format_endpoint(endpoints::DELETE_PENDING, transaction.id))
                                    hx-confirm=(format!("Delete the pending transaction '{}'?", transaction.name))
                                    hx-target-error="#alert-container"
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }

                @if pending.is_empty() {
                    li class="text-center text-sm text-gray-500 dark:text-gray-400"
                    { "No pending transactions." }
                }
            }

            p class="flex justify-between px-4 text-sm font-semibold"
            {
                span { "Total" }
                span data-pending-total="true" { (format_currency(open_total(pending))) }
            }
        }
    )
}
