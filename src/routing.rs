//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    ledger::{
        clear_ledger_item_endpoint, unclear_ledger_item_endpoint, update_ledger_amount_endpoint,
    },
    month_reset::{get_month_reset_page, reset_month_endpoint},
    not_found::get_404_not_found,
    pending::{create_pending_endpoint, delete_pending_endpoint, get_pending_page},
    savings::{get_savings_page, update_savings_endpoint},
    settings::update_balance_endpoint,
    template::{get_template_page, update_template_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PENDING_VIEW, get(get_pending_page))
        .route(endpoints::MONTH_RESET_VIEW, get(get_month_reset_page))
        .route(endpoints::SAVINGS_VIEW, get(get_savings_page))
        .route(endpoints::TEMPLATE_VIEW, get(get_template_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx and need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::BALANCE_API, post(update_balance_endpoint))
            .route(endpoints::CLEAR_LEDGER_ITEM, post(clear_ledger_item_endpoint))
            .route(
                endpoints::UNCLEAR_LEDGER_ITEM,
                post(unclear_ledger_item_endpoint),
            )
            .route(
                endpoints::LEDGER_ITEM_AMOUNT,
                post(update_ledger_amount_endpoint),
            )
            .route(endpoints::PENDING_API, post(create_pending_endpoint))
            .route(endpoints::DELETE_PENDING, delete(delete_pending_endpoint))
            .route(endpoints::MONTH_RESET_API, post(reset_month_endpoint))
            .route(endpoints::SAVINGS_API, post(update_savings_endpoint))
            .route(endpoints::TEMPLATE_API, post(update_template_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
