//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod day;
mod transaction;

pub use amount::{Amount, AmountError};
pub use day::Day;
pub use transaction::{Kind, Transaction, TransactionDraft, TransactionUpdates};
