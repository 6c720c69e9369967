pub mod application;
pub mod cli;
pub mod domain;
pub mod gateway;
pub mod storage;

pub use domain::*;
pub use storage::{LedgerStore, SnapshotStore, SqliteStore};
