use std::collections::HashMap;

use rusqlite::Connection;

use crate::{
    Error,
    database_id::DatabaseId,
    ledger::{NewLedgerItem, delete_ledger, insert_ledger_item},
    pending::delete_all_pending_transactions,
    settings::{SettingKey, get_setting, set_setting},
    template::{TemplateItem, get_template_items},
};

/// The choices made on the month reset page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthReset {
    /// This month's cost of the girls' school canteen.
    pub canteen_cost: f64,
    /// Amounts typed in for variable template items, keyed by template item ID.
    pub variable_amounts: HashMap<DatabaseId, f64>,
    /// Whether to drop the pending transactions as well.
    pub clear_pending: bool,
}

impl MonthReset {
    /// The amount a template item starts the month with.
    ///
    /// The canteen item always takes the computed canteen cost. Variable items
    /// take the amount typed in, falling back to the template amount.
    pub fn ledger_amount(&self, item: &TemplateItem) -> Option<f64> {
        if item.is_canteen {
            Some(self.canteen_cost)
        } else if item.is_variable {
            self.variable_amounts
                .get(&item.id)
                .copied()
                .or(item.amount)
        } else {
            item.amount
        }
    }
}

/// Start a new month: replace the ledger with a fresh copy of the template.
///
/// All changes are made in one transaction, so a failure leaves the previous
/// month untouched.
pub fn reset_month(reset: &MonthReset, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let deleted = delete_ledger(&transaction)?;
    tracing::debug!("Deleted {deleted} ledger items");

    if reset.clear_pending {
        let deleted = delete_all_pending_transactions(&transaction)?;
        tracing::debug!("Deleted {deleted} pending transactions");
    }

    let savings_ignore = get_setting(SettingKey::SavingsIgnore, &transaction)?;
    set_setting(SettingKey::SavingsIgnoreAtReset, savings_ignore, &transaction)?;

    for item in get_template_items(&transaction)? {
        insert_ledger_item(
            &NewLedgerItem {
                template_id: item.id,
                name: &item.name,
                name_en: item.name_en.as_deref(),
                amount: reset.ledger_amount(&item),
                debit_day: item.debit_day,
                is_income: item.is_income,
                is_variable: item.is_variable,
                sort_order: item.sort_order,
            },
            &transaction,
        )?;
    }

    transaction.commit()?;

    Ok(())
}
