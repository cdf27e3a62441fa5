//! In-memory `JobCentreStore` for importer tests

use async_trait::async_trait;
use uuid::Uuid;

use super::store::{JobCentreStore, StoreError};
use crate::types::NewJobCentre;

/// Mimics one transaction over a table: inserts are pending until
/// `commit`, `rollback` drops them.
#[derive(Debug, Default)]
pub(crate) struct MemoryJobCentreStore {
    pub committed: Vec<NewJobCentre>,
    pub pending: Vec<NewJobCentre>,
    /// Inserts of these names are refused as if by a constraint
    pub reject_names: Vec<String>,
    /// Fail with a fault on the nth insert attempt (1-based)
    pub fault_on_insert: Option<usize>,
    /// Fail every duplicate lookup with a fault
    pub fault_on_exists: bool,
    pub insert_attempts: usize,
}

impl MemoryJobCentreStore {
    pub fn commit(&mut self) {
        self.committed.append(&mut self.pending);
    }

    pub fn rollback(&mut self) {
        self.pending.clear();
    }

    pub fn find(&self, name: &str) -> Option<&NewJobCentre> {
        self.committed.iter().find(|c| c.name == name)
    }
}

#[async_trait]
impl JobCentreStore for MemoryJobCentreStore {
    async fn exists(&mut self, name: &str, state: &str) -> Result<bool, StoreError> {
        if self.fault_on_exists {
            return Err(StoreError::Fault(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .committed
            .iter()
            .chain(self.pending.iter())
            .any(|c| c.name == name && c.state == state))
    }

    async fn insert(&mut self, centre: &NewJobCentre) -> Result<Uuid, StoreError> {
        self.insert_attempts += 1;
        if self.fault_on_insert == Some(self.insert_attempts) {
            return Err(StoreError::Fault(sqlx::Error::PoolClosed));
        }
        if self.reject_names.contains(&centre.name) {
            return Err(StoreError::Rejected(format!(
                "duplicate key value violates constraint for '{}'",
                centre.name
            )));
        }
        self.pending.push(centre.clone());
        Ok(Uuid::new_v4())
    }
}
