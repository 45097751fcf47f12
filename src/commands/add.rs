//! Add command handler.

use crate::args::AddArgs;
use crate::blob::BlobStore;
use crate::commands::{render, Out};
use crate::model::Transaction;
use crate::store::TransactionStore;
use crate::Result;

/// Records a new transaction.
///
/// The store assigns the ID and creation time. When `args` has no date, today's local date is
/// used.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - A message describing the new transaction.
/// - The created `Transaction`.
///
/// # Errors
///
/// - Returns an error if the amount, category or date is invalid.
/// - Returns an error if the transaction list cannot be saved.
pub fn add<B: BlobStore>(
    store: &mut TransactionStore<B>,
    args: &AddArgs,
) -> Result<Out<Transaction>> {
    let created = store.create(args.to_draft())?;
    let message = format!("Added {}", render(&created));
    Ok(Out::new(message, created))
}
