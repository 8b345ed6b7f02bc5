use rusqlite::{Connection, Row, params};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId, projection::ProjectedAmount};

/// A purchase that has been made but has not reached the bank account yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    pub id: DatabaseId,
    pub name: String,
    pub amount: f64,
    pub created_at: OffsetDateTime,
}

impl ProjectedAmount for PendingTransaction {
    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

pub fn create_pending_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS pending_transaction (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_pending_transaction(row: &Row) -> Result<PendingTransaction, rusqlite::Error> {
    Ok(PendingTransaction {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Record a pending transaction.
///
/// # Errors
/// Returns [Error::IncompletePendingTransaction] if `name` is blank.
pub fn create_pending_transaction(
    name: &str,
    amount: f64,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<PendingTransaction, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::IncompletePendingTransaction);
    }

    connection.execute(
        "INSERT INTO pending_transaction (name, amount, created_at) VALUES (?1, ?2, ?3)",
        params![name, amount, created_at],
    )?;

    Ok(PendingTransaction {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        amount,
        created_at,
    })
}

/// Get every pending transaction, newest first.
pub fn get_pending_transactions(connection: &Connection) -> Result<Vec<PendingTransaction>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, created_at FROM pending_transaction
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_row_to_pending_transaction)?
        .map(|pending| pending.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

pub fn delete_pending_transaction(
    id: DatabaseId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM pending_transaction WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

pub fn delete_all_pending_transactions(connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM pending_transaction", ())
        .map_err(Error::from)
}
