use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Create a directory and any missing parents.
pub(crate) async fn make_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory at {}", path.to_string_lossy()))
}

/// Resolve `path` to an absolute path with symlinks resolved. The path must exist.
pub(crate) async fn canonicalize(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", path.to_string_lossy()))
}

/// Generates a new, random transaction ID such as `tx-5f0c1a...`.
pub(crate) fn generate_transaction_id() -> String {
    format!("tx-{}", Uuid::new_v4().simple())
}

#[test]
fn test_generate_transaction_id() {
    let a = generate_transaction_id();
    let b = generate_transaction_id();
    assert!(a.starts_with("tx-"));
    assert_eq!(a.len(), 35);
    assert_ne!(a, b);
}
