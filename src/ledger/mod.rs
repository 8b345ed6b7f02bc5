//! The current month's income and expense lines.

mod core;
mod item_endpoints;

pub use core::{
    Ledger, LedgerItem, NewLedgerItem, create_ledger_table, delete_ledger, get_ledger,
    insert_ledger_item,
};
pub use item_endpoints::{
    clear_ledger_item_endpoint, unclear_ledger_item_endpoint, update_ledger_amount_endpoint,
};
