//! Savings balances and the page for updating them together with the girls' allowances.

mod core;
mod savings_page;

pub use core::{SavingsItem, create_savings_table, get_savings_items, seed_savings};
pub use savings_page::{get_savings_page, update_savings_endpoint};
