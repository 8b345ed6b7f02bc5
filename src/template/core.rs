//! The recurring list of income and expense items that each month's ledger is built from.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::DatabaseId};

/// A recurring income or expense line.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItem {
    pub id: DatabaseId,
    /// The Hebrew display name.
    pub name: String,
    pub name_en: Option<String>,
    /// `None` when the amount is decided each month.
    pub amount: Option<f64>,
    /// The day of the month the amount leaves or enters the account.
    pub debit_day: Option<u8>,
    pub is_income: bool,
    /// Whether the amount is entered by hand at each month reset.
    pub is_variable: bool,
    /// Whether the amount is the girls' school canteen cost, computed at each month reset.
    pub is_canteen: bool,
    pub sort_order: i64,
}

/// The template written to an empty database.
struct SeedItem {
    name: &'static str,
    name_en: &'static str,
    amount: Option<f64>,
    debit_day: Option<u8>,
    is_income: bool,
    is_variable: bool,
    is_canteen: bool,
}

const fn income(name: &'static str, name_en: &'static str, amount: Option<f64>) -> SeedItem {
    SeedItem {
        name,
        name_en,
        amount,
        debit_day: None,
        is_income: true,
        is_variable: amount.is_none(),
        is_canteen: false,
    }
}

const fn expense(
    name: &'static str,
    name_en: &'static str,
    amount: Option<f64>,
    debit_day: Option<u8>,
    is_variable: bool,
) -> SeedItem {
    SeedItem {
        name,
        name_en,
        amount,
        debit_day,
        is_income: false,
        is_variable,
        is_canteen: false,
    }
}

const SEED_TEMPLATE: [SeedItem; 15] = [
    income("משכורת תום", "Tom's salary", None),
    income("משכורת תמרי", "Tamari's salary", Some(1200.0)),
    income("CAF ילדים", "CAF children", Some(150.0)),
    income("CAF דירה", "CAF housing", None),
    income("לקבל חזרה מביטוח רפואי", "Medical insurance refund", None),
    income("החזר מהעבודה", "Work reimbursement", None),
    expense("שכר דירה", "Rent", Some(1683.0), Some(28), false),
    expense("חשבון חשמל", "EDF", Some(151.0), Some(16), true),
    expense("נאביגו", "Navigo", Some(230.0), Some(6), true),
    expense("טלפונים ואינטרנט", "Phones & internet", Some(95.0), None, false),
    expense("ביטוח דירה", "Home insurance", Some(13.0), Some(19), false),
    SeedItem {
        is_canteen: true,
        ..expense("אוכל בנות", "Girls' school food", None, Some(5), false)
    },
    expense("עמלת בנק", "Bank fee", Some(22.0), Some(5), false),
    expense("ביטוח בריאות", "Mutuelle", Some(210.0), None, false),
    expense("משיכת מזומן", "Cash withdrawal", None, None, true),
];

pub fn create_template_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_template (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            name_en TEXT,
            amount REAL,
            debit_day INTEGER CHECK (debit_day BETWEEN 1 AND 31),
            is_income INTEGER NOT NULL DEFAULT 0,
            is_variable INTEGER NOT NULL DEFAULT 0,
            is_canteen INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Write the default template if the template table is empty.
pub fn seed_template(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(*) FROM expense_template", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection.prepare(
        "INSERT INTO expense_template
        (name, name_en, amount, debit_day, is_income, is_variable, is_canteen, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for (sort_order, item) in (1..).zip(SEED_TEMPLATE.iter()) {
        statement.execute(params![
            item.name,
            item.name_en,
            item.amount,
            item.debit_day,
            item.is_income,
            item.is_variable,
            item.is_canteen,
            sort_order,
        ])?;
    }

    Ok(())
}

pub fn map_row_to_template_item(row: &Row) -> Result<TemplateItem, rusqlite::Error> {
    Ok(TemplateItem {
        id: row.get(0)?,
        name: row.get(1)?,
        name_en: row.get(2)?,
        amount: row.get(3)?,
        debit_day: row.get(4)?,
        is_income: row.get(5)?,
        is_variable: row.get(6)?,
        is_canteen: row.get(7)?,
        sort_order: row.get(8)?,
    })
}

/// Get the whole template in display order.
pub fn get_template_items(connection: &Connection) -> Result<Vec<TemplateItem>, Error> {
    connection
        .prepare(
            "SELECT id, name, name_en, amount, debit_day, is_income, is_variable, is_canteen, sort_order
            FROM expense_template ORDER BY sort_order ASC, id ASC",
        )?
        .query_map([], map_row_to_template_item)?
        .map(|item| item.map_err(Error::from))
        .collect()
}

/// The edits made to one template item in the template editor.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItemUpdate {
    pub id: DatabaseId,
    pub amount: Option<f64>,
    pub debit_day: Option<u8>,
    pub is_variable: bool,
}

/// Apply the template editor's edits in a single transaction.
///
/// IDs that are not in the template are skipped.
pub fn update_template_items(
    updates: &[TemplateItemUpdate],
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    {
        let mut statement = transaction.prepare(
            "UPDATE expense_template SET amount = ?1, debit_day = ?2, is_variable = ?3 WHERE id = ?4",
        )?;

        for update in updates {
            statement.execute(params![
                update.amount,
                update.debit_day,
                update.is_variable,
                update.id
            ])?;
        }
    }

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{
        TemplateItemUpdate, create_template_table, get_template_items, seed_template,
        update_template_items,
    };

    fn get_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_template_table(&connection).expect("Could not create template table");
        connection
    }

    #[test]
    fn seeds_fifteen_items_in_order() {
        let connection = get_test_connection();

        seed_template(&connection).unwrap();

        let items = get_template_items(&connection).unwrap();
        assert_eq!(items.len(), 15);
        assert_eq!(items.iter().filter(|item| item.is_income).count(), 6);
        assert_eq!(items[0].name_en.as_deref(), Some("Tom's salary"));
        assert!(items[0].is_variable);
        assert_eq!(items[6].name_en.as_deref(), Some("Rent"));
        assert_eq!(items[6].amount, Some(1683.0));
        assert_eq!(items[6].debit_day, Some(28));
        assert!(
            items
                .windows(2)
                .all(|pair| pair[0].sort_order < pair[1].sort_order)
        );
    }

    #[test]
    fn seeds_exactly_one_canteen_item() {
        let connection = get_test_connection();

        seed_template(&connection).unwrap();

        let canteen: Vec<_> = get_template_items(&connection)
            .unwrap()
            .into_iter()
            .filter(|item| item.is_canteen)
            .collect();
        assert_eq!(canteen.len(), 1);
        assert_eq!(canteen[0].name, "אוכל בנות");
        assert_eq!(canteen[0].amount, None);
        assert!(!canteen[0].is_income);
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let connection = get_test_connection();

        seed_template(&connection).unwrap();
        seed_template(&connection).unwrap();

        assert_eq!(get_template_items(&connection).unwrap().len(), 15);
    }

    #[test]
    fn updates_items() {
        let connection = get_test_connection();
        seed_template(&connection).unwrap();
        let rent = get_template_items(&connection).unwrap()[6].clone();

        update_template_items(
            &[TemplateItemUpdate {
                id: rent.id,
                amount: None,
                debit_day: Some(1),
                is_variable: true,
            }],
            &connection,
        )
        .unwrap();

        let got = get_template_items(&connection).unwrap()[6].clone();
        assert_eq!(got.amount, None);
        assert_eq!(got.debit_day, Some(1));
        assert!(got.is_variable);
        assert_eq!(got.name, rent.name);
    }

    #[test]
    fn ignores_missing_ids() {
        let connection = get_test_connection();
        seed_template(&connection).unwrap();
        let before = get_template_items(&connection).unwrap();

        update_template_items(
            &[TemplateItemUpdate {
                id: 999,
                amount: Some(1.0),
                debit_day: None,
                is_variable: false,
            }],
            &connection,
        )
        .unwrap();

        assert_eq!(get_template_items(&connection).unwrap(), before);
    }
}
