//! Projects how much money is left to spend until the next payday.
//!
//! The projection is deliberately pessimistic: income is rounded down, expenses
//! and pending transactions are rounded up, and the final figure is rounded
//! down to a whole number.

/// A ledger entry that may count towards the projection.
pub trait ProjectedAmount {
    /// The amount of money, or `None` if it has not been decided yet.
    fn amount(&self) -> Option<f64>;

    /// Whether the amount has already gone through the bank account and is
    /// therefore part of the balance.
    fn is_cleared(&self) -> bool {
        false
    }
}

/// The account figures that feed into the projection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountFigures {
    /// The current balance of the checking account.
    pub balance: f64,
    /// Money expected to arrive that is not tracked as a ledger item.
    pub future: f64,
    /// Savings held in the checking account that must not be spent.
    pub savings_ignore: f64,
    /// The girls' allowances, set aside from the spendable money.
    pub girls_total: f64,
}

/// The amounts of the items still waiting to hit the bank account.
///
/// Cleared items are already part of the balance, and items without a
/// non-zero amount are still undecided, so both are skipped.
fn open_amounts<T: ProjectedAmount>(items: &[T]) -> impl Iterator<Item = f64> + '_ {
    items
        .iter()
        .filter(|item| !item.is_cleared())
        .filter_map(|item| item.amount())
        .filter(|amount| *amount != 0.0)
}

/// Compute the money that is left to spend once every open item has gone
/// through.
///
/// Each open income item is rounded down and each open expense item is rounded
/// up before summing. Pending transactions are treated as expenses and rounded
/// up. The savings that are set aside and the girls' allowances are then
/// subtracted and the result is rounded down.
pub fn compute_remaining<I, E, P>(
    figures: &AccountFigures,
    income_items: &[I],
    expense_items: &[E],
    pending_transactions: &[P],
) -> i64
where
    I: ProjectedAmount,
    E: ProjectedAmount,
    P: ProjectedAmount,
{
    let income_sum: f64 = open_amounts(income_items).map(f64::floor).sum();
    let expense_sum: f64 = open_amounts(expense_items).map(f64::ceil).sum();
    let pending_sum: f64 = pending_transactions
        .iter()
        .filter_map(|pending| pending.amount())
        .map(f64::ceil)
        .sum();

    let raw = figures.balance + figures.future + income_sum
        - expense_sum
        - pending_sum
        - figures.savings_ignore
        - figures.girls_total;

    raw.floor() as i64
}

/// Spread `remaining` evenly over `days_until_cutoff` days, rounding down.
///
/// Returns zero if there are no days left.
pub fn compute_per_day(remaining: i64, days_until_cutoff: i64) -> i64 {
    if days_until_cutoff > 0 {
        remaining.div_euclid(days_until_cutoff)
    } else {
        0
    }
}

/// The unrounded total of the open items, for display.
pub fn open_total<T: ProjectedAmount>(items: &[T]) -> f64 {
    open_amounts(items).sum()
}
