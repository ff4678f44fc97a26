//! `RestoreError` is the error every command can fail with. Repository errors are mapped
//! into it at the pipeline boundary, keeping precondition failures distinguishable from
//! transport failures.

use repositories::backups::BackupsRepositoryError;
use std::fmt;
use std::fmt::{Display, Formatter};
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("source table {0} not found")]
    SourceNotFound(String),
    #[error("target table {0} not found")]
    TargetNotFound(String),
    #[error("target table {0} already exists")]
    TargetAlreadyExists(String),
    #[error(transparent)]
    BatchWrite(BatchWriteFailures),
    #[error("listing backups failed: {0}")]
    Listing(#[source] BackupsRepositoryError),
    #[error("reading backup {key} failed: {source}")]
    GetObject {
        key: String,
        #[source]
        source: BackupsRepositoryError,
    },
    #[error("invalid arguments: {0}")]
    Validation(String),
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}

impl From<anyhow::Error> for RestoreError {
    fn from(e: anyhow::Error) -> Self {
        Self::Unknown(e)
    }
}

impl From<ValidationErrors> for RestoreError {
    fn from(e: ValidationErrors) -> Self {
        RestoreError::Validation(format!("{e:#}"))
    }
}

impl From<envy::Error> for RestoreError {
    fn from(e: envy::Error) -> Self {
        RestoreError::Unknown(anyhow::anyhow!(e).context("Error loading configuration"))
    }
}

/// One batch that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    pub index: usize,
    pub size: usize,
    pub reason: String,
}

/// Every chunk that failed during a restore. The other chunks were written, so the
/// target table is left partially restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWriteFailures {
    pub table_name: String,
    pub total_chunks: usize,
    pub failed: Vec<ChunkFailure>,
}

impl Display for BatchWriteFailures {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} chunks failed, table {} is partially restored",
            self.failed.len(),
            self.total_chunks,
            self.table_name
        )?;
        for chunk in &self.failed {
            write!(
                f,
                "\n  chunk {} ({} items): {}",
                chunk.index, chunk.size, chunk.reason
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchWriteFailures {}
