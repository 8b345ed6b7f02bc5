use rusqlite::{Connection, OptionalExtension, params};

use crate::{Error, projection::AccountFigures};

/// The names of the values stored in the settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// The balance of the checking account.
    Balance,
    /// Money expected to arrive that is not part of the ledger.
    Future,
    /// Savings kept in the checking account that must not be spent.
    SavingsIgnore,
    /// The value of [SettingKey::SavingsIgnore] when the month was last reset.
    SavingsIgnoreAtReset,
    /// Shachar's allowance.
    GirlsShachar,
    /// Yaara's allowance.
    GirlsYaara,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::Balance,
        SettingKey::Future,
        SettingKey::SavingsIgnore,
        SettingKey::SavingsIgnoreAtReset,
        SettingKey::GirlsShachar,
        SettingKey::GirlsYaara,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKey::Balance => "balance",
            SettingKey::Future => "future",
            SettingKey::SavingsIgnore => "savings_ignore",
            SettingKey::SavingsIgnoreAtReset => "savings_ignore_at_reset",
            SettingKey::GirlsShachar => "girls_shachar",
            SettingKey::GirlsYaara => "girls_yaara",
        }
    }

    /// The value written when the database is first created.
    pub const fn default_value(self) -> f64 {
        match self {
            SettingKey::Balance | SettingKey::Future => 0.0,
            SettingKey::SavingsIgnore | SettingKey::SavingsIgnoreAtReset => 8700.0,
            SettingKey::GirlsShachar | SettingKey::GirlsYaara => 500.0,
        }
    }
}

/// A snapshot of every setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub balance: f64,
    pub future: f64,
    pub savings_ignore: f64,
    pub savings_ignore_at_reset: f64,
    pub girls_shachar: f64,
    pub girls_yaara: f64,
}

impl Settings {
    /// The sum of both girls' allowances.
    pub fn girls_total(&self) -> f64 {
        self.girls_shachar + self.girls_yaara
    }

    pub fn account_figures(&self) -> AccountFigures {
        AccountFigures {
            balance: self.balance,
            future: self.future,
            savings_ignore: self.savings_ignore,
            girls_total: self.girls_total(),
        }
    }
}

pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value REAL NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Write the default value for every setting that is not in the database yet.
pub fn insert_default_settings(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)")?;

    for key in SettingKey::ALL {
        statement.execute(params![key.as_str(), key.default_value()])?;
    }

    Ok(())
}

/// Get a single setting, or zero if it has never been set.
pub fn get_setting(key: SettingKey, connection: &Connection) -> Result<f64, Error> {
    let value = connection
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(value.unwrap_or(0.0))
}

/// Insert or overwrite a setting.
pub fn set_setting(key: SettingKey, value: f64, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
        ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        params![key.as_str(), value],
    )?;

    Ok(())
}

pub fn get_settings(connection: &Connection) -> Result<Settings, Error> {
    Ok(Settings {
        balance: get_setting(SettingKey::Balance, connection)?,
        future: get_setting(SettingKey::Future, connection)?,
        savings_ignore: get_setting(SettingKey::SavingsIgnore, connection)?,
        savings_ignore_at_reset: get_setting(SettingKey::SavingsIgnoreAtReset, connection)?,
        girls_shachar: get_setting(SettingKey::GirlsShachar, connection)?,
        girls_yaara: get_setting(SettingKey::GirlsYaara, connection)?,
    })
}
