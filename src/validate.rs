//! Validation of user-supplied transaction fields.
//!
//! Validation is the only failure the core reports to callers. It is synchronous and does no I/O.

use crate::model::{Amount, Day, Kind, TransactionDraft};
use std::str::FromStr;
use thiserror::Error;

/// The reason a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    #[error("The category must not be empty")]
    EmptyCategory,
    #[error("The amount must be a number greater than zero")]
    NonPositiveAmount,
    #[error("The date must be a valid calendar date written as YYYY-MM-DD")]
    BadDateFormat,
}

/// The normalized fields of a draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransaction {
    pub(crate) kind: Kind,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) notes: Option<String>,
    pub(crate) occurred_on: Day,
}

/// Checks `draft` and returns its normalized form.
///
/// Checks run in a fixed order, so a draft with several problems reports the first of:
/// `EmptyCategory`, `NonPositiveAmount`, `BadDateFormat`.
///
/// Category and notes are trimmed. Notes that are blank after trimming become `None`.
pub fn validate(draft: &TransactionDraft) -> Result<ValidTransaction, ValidationError> {
    let category = draft.category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if !draft.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    let occurred_on = Day::from_str(&draft.occurred_on)?;
    let notes = draft
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(ValidTransaction {
        kind: draft.kind,
        amount: draft.amount,
        category: category.to_string(),
        notes,
        occurred_on,
    })
}
