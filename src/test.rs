//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::blob::BlobStore;
use crate::model::{Amount, Kind, Transaction, TransactionDraft};
use crate::sync::RemoteSync;
use crate::utils::generate_transaction_id;
use crate::validate::validate;
use crate::{Config, Result};
use anyhow::bail;
use chrono::Utc;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Test environment that sets up a budget home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a freshly created Config.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("budget");
        let config = Config::create(&root).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Inserts a transaction through a store opened on this environment's data directory.
    pub fn insert(&self, kind: Kind, amount: &str, category: &str, date: &str) -> Transaction {
        let mut store = self.config.open_store();
        store.create(draft(kind, amount, category, date)).unwrap()
    }

    /// Everything currently persisted in this environment.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.config.open_store().all()
    }
}

/// Builds a draft with no notes.
pub fn draft(kind: Kind, amount: &str, category: &str, date: &str) -> TransactionDraft {
    TransactionDraft {
        kind,
        amount: Amount::from_str(amount).unwrap(),
        category: category.to_string(),
        notes: None,
        occurred_on: date.to_string(),
    }
}

/// Builds a valid transaction without going through a store.
pub fn tx(kind: Kind, amount: &str, category: &str, date: &str) -> Transaction {
    let valid = validate(&draft(kind, amount, category, date)).unwrap();
    Transaction::new(generate_transaction_id(), Utc::now(), valid)
}

/// A `BlobStore` that holds nothing and refuses every write.
#[derive(Debug)]
pub struct FailingBlobStore;

impl BlobStore for FailingBlobStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        bail!("Refusing to write '{key}'")
    }
}

/// A `RemoteSync` that records the length of every snapshot it receives. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingRemote {
    pub(crate) received: Arc<Mutex<Vec<usize>>>,
}

#[async_trait::async_trait]
impl RemoteSync for RecordingRemote {
    async fn push(&self, snapshot: Vec<Transaction>) -> Result<()> {
        self.received.lock().unwrap().push(snapshot.len());
        Ok(())
    }
}
