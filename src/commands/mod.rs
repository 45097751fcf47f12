//! Command handlers for the budget CLI.
//!
//! This module contains implementations for all CLI subcommands. Apart from `init`, every handler
//! works on a `TransactionStore` that the caller has opened once for the process.

mod add;
mod delete;
mod init;
mod query;
mod update;

use crate::model::Transaction;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use delete::{delete, DeleteReport};
pub use init::init;
pub use query::{list, totals, Listing};
pub use update::update;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to the command line.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// One transaction as a single line of text. Expenses are shown with a negative amount.
pub(crate) fn render(t: &Transaction) -> String {
    let mut line = format!(
        "{}  {:>14}  {:<7}  {}  ({})",
        t.occurred_on(),
        t.signed_amount().to_string(),
        t.kind().to_string(),
        t.category(),
        t.id()
    );
    if let Some(notes) = t.notes() {
        line.push_str(" - ");
        line.push_str(notes);
    }
    line
}

pub(crate) fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}
