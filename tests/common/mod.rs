// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use saldo::application::LedgerService;
use saldo::storage::LedgerStore;
use saldo::{SnapshotStore, SqliteStore};
use tempfile::TempDir;

/// Helper to create a test service with a temporary SQLite database
pub async fn test_service() -> Result<(LedgerService<SqliteStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service backed by a JSON snapshot file
pub fn snapshot_service() -> Result<(LedgerService<SnapshotStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("ledger.json");
    let service = LedgerService::open_snapshot(path.to_str().unwrap())?;
    Ok((service, temp_dir))
}

/// Seed the standard scenario: Salary 1000 in, Rent 400 out, Coffee 5 out
pub async fn seed_scenario<S: LedgerStore>(service: &LedgerService<S>) -> Result<()> {
    service.record("Salary", "1000", "income").await?;
    service.record("Rent", "400", "expense").await?;
    service.record("Coffee", "5", "expense").await?;
    Ok(())
}
