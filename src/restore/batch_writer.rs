use std::sync::Arc;

use anyhow::anyhow;
use model::write_intent::WriteIntent;
use repositories::tables::{TablesRepository, TablesRepositoryError, MAX_BATCH_WRITE_ITEMS};

use crate::result::error::{BatchWriteFailures, ChunkFailure, RestoreError};

/// Applies write intents to an existing table in store-sized chunks.
pub struct BatchWriter<TR: TablesRepository> {
    tables_repository: Arc<TR>,
    batch_size: usize,
}

impl<TR: TablesRepository> BatchWriter<TR> {
    /// `batch_size` is clamped to `1..=MAX_BATCH_WRITE_ITEMS`.
    pub fn new(tables_repository: Arc<TR>, batch_size: usize) -> Self {
        Self {
            tables_repository,
            batch_size: batch_size.clamp(1, MAX_BATCH_WRITE_ITEMS),
        }
    }

    /// Describes the target table, failing with `TargetNotFound` when it is missing.
    pub async fn ensure_target_exists(&self, target_table: &str) -> Result<(), RestoreError> {
        self.tables_repository
            .describe_table(target_table.to_owned())
            .await
            .map(|_| ())
            .map_err(|e| match e {
                TablesRepositoryError::TableNotFound(_) => {
                    RestoreError::TargetNotFound(target_table.to_owned())
                }
                e => RestoreError::Unknown(
                    anyhow!(e).context(format!("Error describing target table {target_table}")),
                ),
            })
    }

    /// Checks the target exists, then writes every chunk. Returns the number of chunks
    /// written.
    pub async fn apply(
        &self,
        target_table: &str,
        intents: Vec<WriteIntent>,
    ) -> Result<usize, RestoreError> {
        self.ensure_target_exists(target_table).await?;
        self.write_chunks(target_table, intents).await
    }

    /// Writes the intents chunk by chunk, in order. A failing chunk is logged and the
    /// next one is still attempted; the failures are reported together at the end.
    pub async fn write_chunks(
        &self,
        target_table: &str,
        intents: Vec<WriteIntent>,
    ) -> Result<usize, RestoreError> {
        let mut remaining = intents.into_iter();
        let chunks: Vec<Vec<WriteIntent>> = std::iter::from_fn(|| {
            let chunk: Vec<WriteIntent> = remaining.by_ref().take(self.batch_size).collect();
            (!chunk.is_empty()).then_some(chunk)
        })
        .collect();

        let total_chunks = chunks.len();
        let mut failed = Vec::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let size = chunk.len();
            match self
                .tables_repository
                .batch_write(target_table.to_owned(), chunk)
                .await
            {
                Ok(()) => {
                    tracing::debug!(table_name = ?target_table, chunk = index, size, "chunk written")
                }
                Err(e) => {
                    tracing::error!(
                        table_name = ?target_table,
                        chunk = index,
                        size,
                        error = %e,
                        "chunk failed, continuing with the next one"
                    );
                    failed.push(ChunkFailure {
                        index,
                        size,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if failed.is_empty() {
            tracing::info!(table_name = ?target_table, chunks = total_chunks, "all chunks written");
            Ok(total_chunks)
        } else {
            Err(RestoreError::BatchWrite(BatchWriteFailures {
                table_name: target_table.to_owned(),
                total_chunks,
                failed,
            }))
        }
    }
}
