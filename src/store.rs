//! The transaction store: the ordered list of transactions and its persistence.
//!
//! The list is kept newest-created-first. Every mutation writes the full list, as one JSON array,
//! to a `BlobStore` under a single key. A mutation only replaces the in-memory list once that
//! write has succeeded, and only then is a remote sync dispatched.

use crate::blob::BlobStore;
use crate::model::{Transaction, TransactionDraft, TransactionUpdates};
use crate::sync::Syncer;
use crate::utils::generate_transaction_id;
use crate::validate::{validate, ValidationError};
use chrono::Utc;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// The key under which the transaction list is persisted unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "budgettracker.v1";

/// Errors returned by store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Unable to persist the transaction list")]
    Persist(#[source] anyhow::Error),
}

impl StoreError {
    /// The validation failure, if that is what this error is.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            StoreError::Invalid(v) => Some(*v),
            StoreError::Persist(_) => None,
        }
    }
}

/// Owns the list of transactions and keeps the persisted blob in step with it.
#[derive(Debug)]
pub struct TransactionStore<B: BlobStore> {
    blob: B,
    key: String,
    transactions: Vec<Transaction>,
    syncer: Option<Syncer>,
}

impl<B: BlobStore> TransactionStore<B> {
    /// Opens the store, loading whatever is persisted under `key`. Missing or malformed data
    /// results in an empty store; individual records that are malformed, break a transaction
    /// invariant or repeat an earlier id are dropped.
    pub fn open(blob: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let transactions = read_blob(&blob, &key);
        debug!(
            "Opened store '{key}' with {} transaction(s)",
            transactions.len()
        );
        Self {
            blob,
            key,
            transactions,
            syncer: None,
        }
    }

    /// Sends a snapshot to `syncer` after every successful mutation.
    pub fn with_syncer(mut self, syncer: Syncer) -> Self {
        self.syncer = Some(syncer);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blob(&self) -> &B {
        &self.blob
    }

    pub fn syncer(&self) -> Option<&Syncer> {
        self.syncer.as_ref()
    }

    /// Reads the persisted list. Returns an empty list if nothing is stored or if what is stored
    /// cannot be parsed, and skips records that fail validation. This does not change the store's
    /// in-memory list.
    pub fn load(&self) -> Vec<Transaction> {
        read_blob(&self.blob, &self.key)
    }

    /// A copy of the current list, newest-created-first.
    pub fn all(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// A copy of the transaction with `id`, if any.
    pub fn get(&self, id: &str) -> Option<Transaction> {
        self.transactions.iter().find(|t| t.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Validates `draft` and records it as a new transaction at the front of the list.
    pub fn create(&mut self, draft: TransactionDraft) -> Result<Transaction, StoreError> {
        trace!("create {draft:?}");
        let valid = validate(&draft)?;
        let transaction = Transaction::new(self.fresh_id(), Utc::now(), valid);

        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(transaction.clone());
        next.extend(self.transactions.iter().cloned());
        self.commit(next)?;

        debug!("Created transaction {}", transaction.id());
        Ok(transaction)
    }

    /// Removes the transaction with `id` and returns it. An unknown `id` is not an error; the list
    /// is left as it was (and still persisted).
    pub fn delete(&mut self, id: &str) -> Result<Option<Transaction>, StoreError> {
        trace!("delete {id}");
        let mut next = self.transactions.clone();
        let removed = next
            .iter()
            .position(|t| t.id() == id)
            .map(|ix| next.remove(ix));
        self.commit(next)?;

        match &removed {
            Some(_) => debug!("Deleted transaction {id}"),
            None => debug!("No transaction {id} to delete"),
        }
        Ok(removed)
    }

    /// Merges `updates` into the transaction with `id` and returns the result.
    ///
    /// The merged transaction is validated as a whole; if it would break an invariant the store is
    /// left unchanged and the `ValidationError` is returned. An unknown `id` is not an error and
    /// returns `Ok(None)`.
    pub fn update(
        &mut self,
        id: &str,
        updates: TransactionUpdates,
    ) -> Result<Option<Transaction>, StoreError> {
        trace!("update {id} with {updates:?}");
        let Some(ix) = self.transactions.iter().position(|t| t.id() == id) else {
            debug!("No transaction {id} to update");
            self.commit(self.transactions.clone())?;
            return Ok(None);
        };

        let existing = &self.transactions[ix];
        let valid = validate(&existing.to_draft().merge(updates))?;
        let updated = existing.replace(valid);

        let mut next = self.transactions.clone();
        next[ix] = updated.clone();
        self.commit(next)?;

        debug!("Updated transaction {id}");
        Ok(Some(updated))
    }

    /// Writes `next` to the blob store, then makes it the current list and dispatches a sync.
    fn commit(&mut self, next: Vec<Transaction>) -> Result<(), StoreError> {
        let json = serde_json::to_string(&next).map_err(|e| StoreError::Persist(e.into()))?;
        self.blob
            .set(&self.key, &json)
            .map_err(StoreError::Persist)?;
        self.transactions = next;

        if let Some(syncer) = &self.syncer {
            syncer.dispatch(self.transactions.clone());
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = generate_transaction_id();
            if !self.transactions.iter().any(|t| t.id() == id) {
                return id;
            }
        }
    }
}

fn read_blob<B: BlobStore>(blob: &B, key: &str) -> Vec<Transaction> {
    let raw = match blob.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Unable to read the data stored under '{key}', starting empty: {e:#}");
            return Vec::new();
        }
    };
    let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("Discarding malformed data stored under '{key}': {e}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut transactions = Vec::with_capacity(records.len());
    for (ix, record) in records.into_iter().enumerate() {
        match check_record(record) {
            Ok(t) if seen.insert(t.id().to_string()) => transactions.push(t),
            Ok(t) => warn!(
                "Discarding record {ix} stored under '{key}': duplicate id '{}'",
                t.id()
            ),
            Err(reason) => warn!("Discarding record {ix} stored under '{key}': {reason}"),
        }
    }
    transactions
}

/// Parses one stored record and holds it to the same rules as a new transaction.
fn check_record(record: serde_json::Value) -> Result<Transaction, String> {
    let stored: Transaction = serde_json::from_value(record).map_err(|e| e.to_string())?;
    if stored.id().trim().is_empty() {
        return Err("the id is empty".to_string());
    }
    let valid = validate(&stored.to_draft()).map_err(|e| e.to_string())?;
    Ok(stored.replace(valid))
}
