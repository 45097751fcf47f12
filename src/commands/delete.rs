//! Delete command handler.

use crate::args::DeleteArgs;
use crate::blob::BlobStore;
use crate::commands::{plural, Out};
use crate::store::TransactionStore;
use crate::Result;
use serde::{Deserialize, Serialize};

/// The IDs that were deleted and those that did not exist.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub missing: Vec<String>,
}

/// Deletes each transaction named in `args`, one at a time.
///
/// IDs that do not exist are reported in the message and the returned `DeleteReport`; they are not
/// an error. If saving fails partway through, the transactions deleted before the failure stay
/// deleted.
pub fn delete<B: BlobStore>(
    store: &mut TransactionStore<B>,
    args: &DeleteArgs,
) -> Result<Out<DeleteReport>> {
    let mut report = DeleteReport::default();
    for id in args.ids() {
        match store.delete(id)? {
            Some(_) => report.deleted.push(id.clone()),
            None => report.missing.push(id.clone()),
        }
    }

    let mut message = format!(
        "Deleted {}",
        plural(report.deleted.len(), "transaction", "transactions")
    );
    if !report.missing.is_empty() {
        message.push_str(&format!(
            ", not found: {}",
            report.missing.join(", ")
        ));
    }
    Ok(Out::new(message, report))
}
