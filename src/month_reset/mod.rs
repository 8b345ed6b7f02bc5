//! Starting a new month by copying the template into the ledger.

mod core;
mod reset_page;

pub use reset_page::{get_month_reset_page, reset_month_endpoint};
