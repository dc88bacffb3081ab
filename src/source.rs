use crate::config::DatasetConfig;
use crate::generator::DatasetGenerator;
use crate::model::{FactTables, StorageError};
use crate::storage::SqliteStorage;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Supplies the fact tables an analysis run works over.
#[async_trait::async_trait]
pub trait FactSource: Send + Sync {
    async fn load_facts(&self) -> Result<FactTables, StorageError>;
}

/// Generates a fresh synthetic snapshot and archives it, replacing whatever
/// the previous run stored.
pub struct SyntheticFactSource {
    dataset: DatasetConfig,
    storage: Arc<Mutex<SqliteStorage>>,
}

impl SyntheticFactSource {
    pub fn new(dataset: DatasetConfig, storage: Arc<Mutex<SqliteStorage>>) -> Self {
        Self { dataset, storage }
    }
}

#[async_trait::async_trait]
impl FactSource for SyntheticFactSource {
    async fn load_facts(&self) -> Result<FactTables, StorageError> {
        let mut generator = DatasetGenerator::new(self.dataset.seed, Utc::now());
        let facts = generator.dataset(&self.dataset);
        info!(
            "Generated synthetic snapshot (seed {}): {} users, {} transactions, {} logins, {} unlocks",
            self.dataset.seed,
            facts.users.len(),
            facts.transactions.len(),
            facts.logins.len(),
            facts.unlocks.len()
        );

        let storage = self.storage.lock().await;
        storage.clear_facts()?;
        for user in &facts.users {
            storage.save_user(user)?;
        }
        for tx in &facts.transactions {
            storage.save_transaction(tx)?;
        }
        for login in &facts.logins {
            storage.save_login_event(login)?;
        }
        for unlock in &facts.unlocks {
            storage.save_achievement_unlock(unlock)?;
        }
        info!("Snapshot archived");

        Ok(facts)
    }
}

/// Reads back the snapshot archived by a previous run.
pub struct SqliteFactSource {
    storage: Arc<Mutex<SqliteStorage>>,
}

impl SqliteFactSource {
    pub fn new(storage: Arc<Mutex<SqliteStorage>>) -> Self {
        Self { storage }
    }
}

#[async_trait::async_trait]
impl FactSource for SqliteFactSource {
    async fn load_facts(&self) -> Result<FactTables, StorageError> {
        let storage = self.storage.lock().await;
        Ok(FactTables {
            users: storage.load_users()?,
            transactions: storage.load_transactions()?,
            logins: storage.load_login_events()?,
            unlocks: storage.load_achievement_unlocks()?,
        })
    }
}
