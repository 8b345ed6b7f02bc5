use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::DatabaseId, projection::ProjectedAmount};

/// One income or expense line of the current month.
///
/// Ledger items are copied from the template at each month reset and are
/// edited independently of the template afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerItem {
    pub id: DatabaseId,
    /// The template item this line was copied from.
    pub template_id: Option<DatabaseId>,
    pub name: String,
    pub name_en: Option<String>,
    pub amount: Option<f64>,
    pub debit_day: Option<u8>,
    pub is_income: bool,
    pub is_variable: bool,
    /// Whether the money has gone through the bank account.
    pub is_cleared: bool,
    pub sort_order: i64,
}

impl ProjectedAmount for LedgerItem {
    fn amount(&self) -> Option<f64> {
        self.amount
    }

    fn is_cleared(&self) -> bool {
        self.is_cleared
    }
}

/// A ledger item to be inserted at month reset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerItem<'a> {
    pub template_id: DatabaseId,
    pub name: &'a str,
    pub name_en: Option<&'a str>,
    pub amount: Option<f64>,
    pub debit_day: Option<u8>,
    pub is_income: bool,
    pub is_variable: bool,
    pub sort_order: i64,
}

/// The current month's ledger split into income and expenses, each in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub income: Vec<LedgerItem>,
    pub expenses: Vec<LedgerItem>,
}

pub fn create_ledger_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS ledger (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            template_id INTEGER,
            name TEXT NOT NULL,
            name_en TEXT,
            amount REAL,
            debit_day INTEGER,
            is_income INTEGER NOT NULL DEFAULT 0,
            is_variable INTEGER NOT NULL DEFAULT 0,
            is_cleared INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_ledger_item(row: &Row) -> Result<LedgerItem, rusqlite::Error> {
    Ok(LedgerItem {
        id: row.get(0)?,
        template_id: row.get(1)?,
        name: row.get(2)?,
        name_en: row.get(3)?,
        amount: row.get(4)?,
        debit_day: row.get(5)?,
        is_income: row.get(6)?,
        is_variable: row.get(7)?,
        is_cleared: row.get(8)?,
        sort_order: row.get(9)?,
    })
}

/// Get the current month's ledger.
pub fn get_ledger(connection: &Connection) -> Result<Ledger, Error> {
    let items: Vec<LedgerItem> = connection
        .prepare(
            "SELECT id, template_id, name, name_en, amount, debit_day, is_income, is_variable, \
            is_cleared, sort_order FROM ledger ORDER BY sort_order ASC, id ASC",
        )?
        .query_map([], map_row_to_ledger_item)?
        .collect::<Result<_, _>>()?;

    let (income, expenses) = items.into_iter().partition(|item| item.is_income);

    Ok(Ledger { income, expenses })
}

pub fn insert_ledger_item(item: &NewLedgerItem, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO ledger
        (template_id, name, name_en, amount, debit_day, is_income, is_variable, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            item.template_id,
            item.name,
            item.name_en,
            item.amount,
            item.debit_day,
            item.is_income,
            item.is_variable,
            item.sort_order,
        ],
    )?;

    Ok(())
}

/// Remove every ledger item, returning how many were removed.
pub fn delete_ledger(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM ledger", ())
        .map_err(Error::from)
}

/// Mark a ledger item as cleared or not.
///
/// # Errors
/// Returns [Error::UpdateMissingLedgerItem] if `id` is not in the ledger.
pub fn set_cleared(id: DatabaseId, is_cleared: bool, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE ledger SET is_cleared = ?1 WHERE id = ?2",
        params![is_cleared, id],
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingLedgerItem),
        _ => Ok(()),
    }
}

/// Overwrite the amount of a ledger item.
///
/// # Errors
/// Returns [Error::UpdateMissingLedgerItem] if `id` is not in the ledger.
pub fn update_ledger_amount(
    id: DatabaseId,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE ledger SET amount = ?1 WHERE id = ?2",
        params![amount, id],
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingLedgerItem),
        _ => Ok(()),
    }
}
