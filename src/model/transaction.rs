use crate::model::{Amount, Day};
use crate::validate::ValidTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or takes it out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

/// A single recorded income or expense event.
///
/// Transactions are only constructed by the store, after validation, so every instance the store
/// hands out satisfies the invariants: positive amount, non-blank category and a well-formed date.
/// Deserializing alone does not check them; the store re-validates every record it loads.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: String,
    kind: Kind,
    amount: Amount,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    occurred_on: Day,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(id: String, created_at: DateTime<Utc>, valid: ValidTransaction) -> Self {
        Self {
            id,
            kind: valid.kind,
            amount: valid.amount,
            category: valid.category,
            notes: valid.notes,
            occurred_on: valid.occurred_on,
            created_at,
        }
    }

    /// Replaces every user-editable field, keeping `id` and `created_at`.
    pub(crate) fn replace(&self, valid: ValidTransaction) -> Self {
        Self::new(self.id.clone(), self.created_at, valid)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The stored amount, which is always positive.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The amount with the sign implied by `kind`: negative for expenses.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn occurred_on(&self) -> Day {
        self.occurred_on
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Turns the transaction back into the draft that would produce it.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            amount: self.amount,
            category: self.category.clone(),
            notes: self.notes.clone(),
            occurred_on: self.occurred_on.to_string(),
        }
    }
}

/// The user-supplied fields of a new transaction, before validation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: Kind,
    pub amount: Amount,
    pub category: String,
    pub notes: Option<String>,
    /// Expected as `YYYY-MM-DD`.
    pub occurred_on: String,
}

impl TransactionDraft {
    /// Merges `updates` into this draft. Fields that are `None` in `updates` are kept.
    pub fn merge(mut self, updates: TransactionUpdates) -> Self {
        if let Some(kind) = updates.kind {
            self.kind = kind;
        }
        if let Some(amount) = updates.amount {
            self.amount = amount;
        }
        if let Some(category) = updates.category {
            self.category = category;
        }
        if let Some(notes) = updates.notes {
            self.notes = Some(notes);
        }
        if let Some(occurred_on) = updates.occurred_on {
            self.occurred_on = occurred_on;
        }
        self
    }
}

/// Partial changes to an existing transaction. `None` fields are left unchanged; an empty `notes`
/// string clears the notes.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdates {
    pub kind: Option<Kind>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub occurred_on: Option<String>,
}

impl TransactionUpdates {
    /// True if no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
