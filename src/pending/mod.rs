//! Purchases that have been made but have not reached the bank account yet.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod pending_page;

pub use core::{
    PendingTransaction, create_pending_table, create_pending_transaction,
    delete_all_pending_transactions, get_pending_transactions,
};
pub use create_endpoint::create_pending_endpoint;
pub use delete_endpoint::delete_pending_endpoint;
pub use pending_page::{get_pending_page, pending_form, pending_list};
