//! Persistence seam for the job centre importer

use async_trait::async_trait;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::queries;
use crate::types::NewJobCentre;

/// Failure reported by a [`JobCentreStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The row was refused (constraint violation, bad value). Only that row is lost.
    #[error("{0}")]
    Rejected(String),
    /// The store itself failed. The whole run must be rolled back.
    #[error(transparent)]
    Fault(sqlx::Error),
}

impl StoreError {
    /// Database-reported errors are row-scoped; anything else (I/O, pool,
    /// protocol) is a fault.
    pub fn from_insert(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => StoreError::Rejected(db.message().to_string()),
            other => StoreError::Fault(other),
        }
    }
}

/// Where imported job centres go
#[async_trait]
pub trait JobCentreStore: Send {
    /// Exact (name, state) lookup backing the duplicate policy
    async fn exists(&mut self, name: &str, state: &str) -> Result<bool, StoreError>;

    /// Persist one job centre
    async fn insert(&mut self, centre: &NewJobCentre) -> Result<Uuid, StoreError>;
}

/// PostgreSQL store scoped to a single transaction.
///
/// Each insert runs in its own savepoint so a rejected row is undone alone
/// and the surrounding transaction stays usable.
pub struct PgJobCentreStore {
    tx: Transaction<'static, Postgres>,
}

impl PgJobCentreStore {
    pub async fn begin(pool: &PgPool) -> sqlx::Result<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> sqlx::Result<()> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> sqlx::Result<()> {
        self.tx.rollback().await
    }
}

#[async_trait]
impl JobCentreStore for PgJobCentreStore {
    async fn exists(&mut self, name: &str, state: &str) -> Result<bool, StoreError> {
        queries::job_centre::exists_by_name_and_state(&mut *self.tx, name, state)
            .await
            .map_err(StoreError::Fault)
    }

    async fn insert(&mut self, centre: &NewJobCentre) -> Result<Uuid, StoreError> {
        let mut savepoint = Acquire::begin(&mut self.tx)
            .await
            .map_err(StoreError::Fault)?;

        match queries::job_centre::insert_job_centre(&mut *savepoint, centre).await {
            Ok(id) => {
                savepoint.commit().await.map_err(StoreError::Fault)?;
                Ok(id)
            }
            Err(e) => {
                savepoint.rollback().await.map_err(StoreError::Fault)?;
                Err(StoreError::from_insert(e))
            }
        }
    }
}
