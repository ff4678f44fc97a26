use std::sync::Arc;

use anyhow::anyhow;
use model::table_schema::TableSchema;
use repositories::tables::{TablesRepository, TablesRepositoryError};

use crate::result::error::RestoreError;

/// Provisions an empty table shaped like an existing one.
pub struct SchemaCloner<TR: TablesRepository> {
    tables_repository: Arc<TR>,
}

impl<TR: TablesRepository> SchemaCloner<TR> {
    pub fn new(tables_repository: Arc<TR>) -> Self {
        Self { tables_repository }
    }

    /// Creates `target_table` with the source's key schema, attribute definitions,
    /// indexes, capacity and stream settings. No data is copied and the call does not
    /// wait for the new table to become active. Returns the schema that was requested.
    pub async fn clone_schema(
        &self,
        source_table: &str,
        target_table: &str,
    ) -> Result<TableSchema, RestoreError> {
        let source = self
            .tables_repository
            .describe_table(source_table.to_owned())
            .await
            .map_err(|e| match e {
                TablesRepositoryError::TableNotFound(_) => {
                    RestoreError::SourceNotFound(source_table.to_owned())
                }
                e => RestoreError::Unknown(
                    anyhow!(e).context(format!("Error describing source table {source_table}")),
                ),
            })?;

        let target = source.renamed(target_table);
        tracing::info!(
            source_table = ?source_table,
            target_table = ?target_table,
            global_indexes = target.global_secondary_indexes.len(),
            local_indexes = target.local_secondary_indexes.len(),
            "creating table from source schema"
        );

        self.tables_repository
            .create_table(target.clone())
            .await
            .map_err(|e| match e {
                TablesRepositoryError::TableAlreadyExists(_) => {
                    RestoreError::TargetAlreadyExists(target_table.to_owned())
                }
                e => RestoreError::Unknown(
                    anyhow!(e).context(format!("Error creating target table {target_table}")),
                ),
            })?;

        Ok(target)
    }
}
