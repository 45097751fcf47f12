//! Update command handler.

use crate::args::UpdateArgs;
use crate::blob::BlobStore;
use crate::commands::{render, Out};
use crate::model::Transaction;
use crate::store::TransactionStore;
use crate::Result;
use anyhow::bail;

/// Changes the fields given in `args` on the transaction with the given ID.
///
/// The changed transaction must still be valid as a whole; otherwise nothing is changed. An ID
/// that does not exist is reported in the message and is not an error.
///
/// # Returns
///
/// On success, returns an `Out` containing:
/// - A message describing the outcome.
/// - The updated `Transaction`, or `None` if the ID was not found.
///
/// # Errors
///
/// - Returns an error if no field to change was given.
/// - Returns an error if the updated transaction would be invalid.
/// - Returns an error if the transaction list cannot be saved.
pub fn update<B: BlobStore>(
    store: &mut TransactionStore<B>,
    args: &UpdateArgs,
) -> Result<Out<Option<Transaction>>> {
    let updates = args.updates();
    if updates.is_empty() {
        bail!("Nothing to update, pass at least one field to change");
    }
    let id = args.id();
    let out = match store.update(id, updates)? {
        Some(updated) => Out::new(format!("Updated {}", render(&updated)), Some(updated)),
        None => Out::new(format!("No transaction found with ID '{id}'"), None),
    };
    Ok(out)
}
