//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/pending/{pending_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing the projection and the current month's ledger.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The mobile-friendly page for logging pending transactions.
pub const PENDING_VIEW: &str = "/pending";
/// The page for starting a new month.
pub const MONTH_RESET_VIEW: &str = "/month_reset";
/// The page for updating savings and the girls' allowances.
pub const SAVINGS_VIEW: &str = "/savings";
/// The page for editing the recurring template.
pub const TEMPLATE_VIEW: &str = "/template";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for logging in.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for logging out.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for updating the balance, future and savings-ignore figures.
pub const BALANCE_API: &str = "/api/balance";
/// The route for marking a ledger item as cleared.
pub const CLEAR_LEDGER_ITEM: &str = "/api/ledger/{item_id}/clear";
/// The route for marking a ledger item as not cleared.
pub const UNCLEAR_LEDGER_ITEM: &str = "/api/ledger/{item_id}/unclear";
/// The route for changing the amount of a ledger item.
pub const LEDGER_ITEM_AMOUNT: &str = "/api/ledger/{item_id}/amount";
/// The route for adding a pending transaction.
pub const PENDING_API: &str = "/api/pending";
/// The route for deleting a pending transaction.
pub const DELETE_PENDING: &str = "/api/pending/{pending_id}";
/// The route for resetting the month.
pub const MONTH_RESET_API: &str = "/api/month_reset";
/// The route for updating savings.
pub const SAVINGS_API: &str = "/api/savings";
/// The route for updating the recurring template.
pub const TEMPLATE_API: &str = "/api/template";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/pending/{pending_id}', '{pending_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
