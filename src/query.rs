//! Filtering and totals over a list of transactions.

use crate::model::{Amount, Day, Kind, Transaction};
use serde::{Deserialize, Serialize};

/// Transient query parameters. Every field is optional and an absent field places no constraint.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring that the category must contain. Surrounding whitespace is
    /// ignored, and a blank value matches everything.
    pub category: Option<String>,
    /// Earliest `occurred_on`, inclusive.
    pub from: Option<Day>,
    /// Latest `occurred_on`, inclusive.
    pub to: Option<Day>,
}

impl FilterSpec {
    pub fn new(category: Option<String>, from: Option<Day>, to: Option<Day>) -> Self {
        Self { category, from, to }
    }

    /// True if the filter places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.needle().is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Returns true if `transaction` satisfies every constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        category_matches(transaction, self.needle().as_deref()) && self.matches_dates(transaction)
    }

    fn needle(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_dates(&self, transaction: &Transaction) -> bool {
        let day = transaction.occurred_on();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// `needle` must already be lowercase.
fn category_matches(transaction: &Transaction, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => transaction.category().to_lowercase().contains(needle),
    }
}

/// Returns the transactions that match `spec`, in their original order.
pub fn filter(list: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    let needle = spec.needle();
    list.iter()
        .filter(|t| category_matches(t, needle.as_deref()) && spec.matches_dates(t))
        .cloned()
        .collect()
}

/// Aggregate sums over a list of transactions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

/// Sums income and expense amounts separately; `balance` is income minus expense.
///
/// Sums that would overflow are clamped to the largest (or smallest) representable amount.
pub fn totals(list: &[Transaction]) -> Totals {
    let (income, expense) = list.iter().fold(
        (Amount::ZERO, Amount::ZERO),
        |(income, expense), t| match t.kind() {
            Kind::Income => (income.saturating_add(t.amount()), expense),
            Kind::Expense => (income, expense.saturating_add(t.amount())),
        },
    );
    Totals {
        income,
        expense,
        balance: income.saturating_sub(expense),
    }
}
