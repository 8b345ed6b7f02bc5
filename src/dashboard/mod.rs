//! Dashboard module
//!
//! The landing page: how much money is left to spend until the 25th, the
//! balance figures, pending transactions and the current month's ledger.

mod cards;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
