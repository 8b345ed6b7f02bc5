use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::DatabaseId};

/// Money put aside in a savings account or investment.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsItem {
    pub id: DatabaseId,
    pub name: String,
    pub amount: f64,
    /// Whether the savings are kept in the checking account, in which case
    /// they are excluded from the spendable money.
    pub is_checking: bool,
    pub sort_order: i64,
}

const SEED_SAVINGS: [(&str, f64, bool); 4] = [
    ("בתוך העו\"ש", 8700.0, true),
    ("פק\"מ א", 11728.0, false),
    ("פק\"מ ב", 13739.0, false),
    ("מניות", 33570.0, false),
];

pub fn create_savings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            is_checking INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Write the default savings items if the savings table is empty.
pub fn seed_savings(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(*) FROM savings", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection.prepare(
        "INSERT INTO savings (name, amount, is_checking, sort_order) VALUES (?1, ?2, ?3, ?4)",
    )?;

    for (sort_order, (name, amount, is_checking)) in (1..).zip(SEED_SAVINGS) {
        statement.execute(params![name, amount, is_checking, sort_order])?;
    }

    Ok(())
}

pub fn map_row_to_savings_item(row: &Row) -> Result<SavingsItem, rusqlite::Error> {
    Ok(SavingsItem {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        is_checking: row.get(3)?,
        sort_order: row.get(4)?,
    })
}

pub fn get_savings_items(connection: &Connection) -> Result<Vec<SavingsItem>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, is_checking, sort_order FROM savings
            ORDER BY sort_order ASC, id ASC",
        )?
        .query_map([], map_row_to_savings_item)?
        .map(|item| item.map_err(Error::from))
        .collect()
}

/// Overwrite the amount of a savings item, returning the updated item or
/// `None` if `id` is not a savings item.
pub fn update_savings_amount(
    id: DatabaseId,
    amount: f64,
    connection: &Connection,
) -> Result<Option<SavingsItem>, Error> {
    let rows_affected = connection.execute(
        "UPDATE savings SET amount = ?1 WHERE id = ?2",
        params![amount, id],
    )?;

    if rows_affected == 0 {
        return Ok(None);
    }

    connection
        .query_one(
            "SELECT id, name, amount, is_checking, sort_order FROM savings WHERE id = ?1",
            params![id],
            map_row_to_savings_item,
        )
        .map(Some)
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{create_savings_table, get_savings_items, seed_savings, update_savings_amount};

    fn get_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_savings_table(&connection).expect("Could not create savings table");
        seed_savings(&connection).expect("Could not seed savings");
        connection
    }

    #[test]
    fn seeds_four_items_with_one_checking() {
        let connection = get_test_connection();

        let items = get_savings_items(&connection).unwrap();

        let amounts: Vec<f64> = items.iter().map(|item| item.amount).collect();
        assert_eq!(amounts, vec![8700.0, 11728.0, 13739.0, 33570.0]);
        assert!(items[0].is_checking);
        assert_eq!(items.iter().filter(|item| item.is_checking).count(), 1);
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let connection = get_test_connection();

        seed_savings(&connection).unwrap();

        assert_eq!(get_savings_items(&connection).unwrap().len(), 4);
    }

    #[test]
    fn updates_amount() {
        let connection = get_test_connection();
        let stocks = get_savings_items(&connection).unwrap()[3].clone();

        let updated = update_savings_amount(stocks.id, 40000.0, &connection).unwrap();

        assert_eq!(updated.map(|item| item.amount), Some(40000.0));
        assert_eq!(get_savings_items(&connection).unwrap()[3].amount, 40000.0);
    }

    #[test]
    fn missing_item_is_none() {
        let connection = get_test_connection();

        assert_eq!(update_savings_amount(999, 1.0, &connection), Ok(None));
    }
}
