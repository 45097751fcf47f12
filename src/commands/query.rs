//! Listing commands.
//!
//! Both commands take the store's current list, apply the filter and then sum what is left, so the
//! totals always describe exactly the transactions that were selected.

use crate::args::FilterArgs;
use crate::blob::BlobStore;
use crate::commands::{plural, render, Out};
use crate::model::Transaction;
use crate::query::{filter, totals as sum, FilterSpec, Totals};
use crate::store::TransactionStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The filtered transactions together with their totals.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
}

/// Lists the transactions matching `args`, newest-created first, followed by their totals.
pub fn list<B: BlobStore>(store: &TransactionStore<B>, args: &FilterArgs) -> Result<Out<Listing>> {
    let spec = args.to_filter();
    let listing = select(store, &spec);

    let mut message = if listing.transactions.is_empty() {
        String::from("No transactions")
    } else {
        let lines: Vec<String> = listing.transactions.iter().map(render).collect();
        lines.join("\n")
    };
    message.push('\n');
    message.push_str(&summary(listing.transactions.len(), &listing.totals));
    Ok(Out::new(message, listing))
}

/// Shows the totals of the transactions matching `args`.
pub fn totals<B: BlobStore>(store: &TransactionStore<B>, args: &FilterArgs) -> Result<Out<Totals>> {
    let listing = select(store, &args.to_filter());
    let message = summary(listing.transactions.len(), &listing.totals);
    Ok(Out::new(message, listing.totals))
}

fn select<B: BlobStore>(store: &TransactionStore<B>, spec: &FilterSpec) -> Listing {
    trace!("select {spec:?}");
    let transactions = filter(&store.all(), spec);
    let totals = sum(&transactions);
    Listing {
        transactions,
        totals,
    }
}

fn summary(count: usize, totals: &Totals) -> String {
    format!(
        "{}: income {}, expense {}, balance {}",
        plural(count, "transaction", "transactions"),
        totals.income,
        totals.expense,
        totals.balance
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Day, Kind};
    use crate::test::TestEnv;
    use std::str::FromStr;

    fn day(s: &str) -> Option<Day> {
        Some(Day::from_str(s).unwrap())
    }

    async fn env() -> TestEnv {
        let env = TestEnv::new().await;
        env.insert(Kind::Income, "1000", "Salary", "2024-01-05");
        env.insert(Kind::Expense, "40", "Food", "2024-01-12");
        env.insert(Kind::Expense, "15.25", "Seafood", "2024-01-21");
        env
    }

    #[tokio::test]
    async fn test_list_everything() {
        let env = env().await;
        let store = env.config().open_store();

        let out = list(&store, &FilterArgs::default()).unwrap();

        let listing = out.structure().unwrap();
        let categories: Vec<_> = listing.transactions.iter().map(|t| t.category()).collect();
        assert_eq!(categories, vec!["Seafood", "Food", "Salary"]);
        assert_eq!(listing.totals.income, Amount::from_str("1000").unwrap());
        assert_eq!(listing.totals.expense, Amount::from_str("55.25").unwrap());
        assert_eq!(listing.totals.balance, Amount::from_str("944.75").unwrap());
        assert!(out.message().contains("-40.00"));
        assert!(out
            .message()
            .ends_with("3 transactions: income 1,000.00, expense 55.25, balance 944.75"));
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let env = env().await;
        let store = env.config().open_store();

        let args = FilterArgs::new(Some("FOOD".to_string()), None, day("2024-01-20"));
        let out = list(&store, &args).unwrap();

        let listing = out.structure().unwrap();
        assert_eq!(listing.transactions.len(), 1);
        assert_eq!(listing.transactions[0].category(), "Food");
        assert_eq!(listing.totals.balance, Amount::from_str("-40").unwrap());
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let store = env.config().open_store();
        let out = list(&store, &FilterArgs::default()).unwrap();
        assert!(out.message().starts_with("No transactions"));
        assert_eq!(out.structure().unwrap().totals, Totals::default());
    }

    #[tokio::test]
    async fn test_totals_date_range() {
        let env = env().await;
        let store = env.config().open_store();

        let args = FilterArgs::new(None, day("2024-01-10"), day("2024-01-20"));
        let out = totals(&store, &args).unwrap();

        let t = out.structure().unwrap();
        assert!(t.income.is_zero());
        assert_eq!(t.expense, Amount::from_str("40").unwrap());
        assert!(out.message().starts_with("1 transaction:"));
    }
}
