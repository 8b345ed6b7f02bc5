//! Creates the application's tables and seeds them with the initial data.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    ledger::create_ledger_table,
    pending::create_pending_table,
    savings::{create_savings_table, seed_savings},
    settings::{create_settings_table, insert_default_settings},
    template::{create_template_table, seed_template},
};

/// Create the app's tables if they are missing and seed them.
///
/// Missing settings get their default values. The template and savings are
/// only seeded when their tables are empty, so existing data is left alone
/// and the function is safe to call on every start up.
///
/// # Errors
/// Returns an error if there is an SQL error. Nothing is written in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_settings_table(&transaction)?;
    create_template_table(&transaction)?;
    create_ledger_table(&transaction)?;
    create_pending_table(&transaction)?;
    create_savings_table(&transaction)?;

    insert_default_settings(&transaction)?;
    seed_template(&transaction)?;
    seed_savings(&transaction)?;

    transaction.commit()?;

    Ok(())
}
