//! Replays change logs kept in object storage onto a table.
//!
//! The pipeline reads every backup of the source table, decodes its lines into change
//! events, reconciles them down to the latest event per primary key, classifies each
//! survivor into a put or a delete, and writes those in batches to the target table.
//! Each stage consumes its whole input before the next starts, as reconciliation needs
//! the complete event set.
//!
//! A full table export holds one item per line instead of change records. It already is
//! the final state of every key, so its items go straight to the batch writer as puts.

use std::sync::Arc;

use clap::ValueEnum;
use model::change_event::ChangeEvent;
use model::write_intent::WriteIntent;
use repositories::backups::BackupsRepository;
use repositories::tables::TablesRepository;
use serde::Serialize;

use crate::config::RestoreConfig;
use crate::result::error::RestoreError;

pub mod batch_writer;
pub mod catalog;
pub mod decoder;
pub mod reconciler;
pub mod schema_cloner;

use batch_writer::BatchWriter;
use catalog::BackupCatalog;
use decoder::{decode_backup, decode_item_export, DecodedLines};
use reconciler::reconcile;

/// Layout of the lines inside a backup object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BackupFormat {
    /// Stream change records (`Keys`, `NewImage`, `eventName`, ...).
    #[default]
    ChangeLog,
    /// One bare item per line, as written by a table export.
    ItemExport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreRequest {
    pub source_table: String,
    pub target_table: String,
    pub prefix: String,
    pub format: BackupFormat,
    /// Stop after classification and write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreSummary {
    pub format: BackupFormat,
    pub objects_read: usize,
    pub lines_decoded: usize,
    pub lines_skipped: usize,
    pub events_before_reconciliation: usize,
    pub events_after_reconciliation: usize,
    pub puts: usize,
    pub deletes: usize,
    pub chunks_written: usize,
    pub dry_run: bool,
}

pub struct Restorer<BR: BackupsRepository, TR: TablesRepository> {
    catalog: BackupCatalog<BR>,
    batch_writer: BatchWriter<TR>,
}

impl<BR: BackupsRepository, TR: TablesRepository> Restorer<BR, TR> {
    pub fn new(
        backups_repository: Arc<BR>,
        tables_repository: Arc<TR>,
        config: &RestoreConfig,
    ) -> Self {
        Self {
            catalog: BackupCatalog::new(backups_repository, config.backup_file_extension.clone()),
            batch_writer: BatchWriter::new(tables_repository, config.batch_size),
        }
    }

    pub async fn restore(&self, request: &RestoreRequest) -> Result<RestoreSummary, RestoreError> {
        let mut summary = RestoreSummary {
            format: request.format,
            dry_run: request.dry_run,
            ..RestoreSummary::default()
        };

        self.batch_writer
            .ensure_target_exists(&request.target_table)
            .await?;

        let intents = match request.format {
            BackupFormat::ChangeLog => {
                let events = self
                    .read_records(request, &mut summary, decode_backup)
                    .await?;
                summary.events_before_reconciliation = events.len();

                let survivors = reconcile(events);
                summary.events_after_reconciliation = survivors.len();

                classify(survivors)
            }
            BackupFormat::ItemExport => self
                .read_records(request, &mut summary, decode_item_export)
                .await?
                .into_iter()
                .map(WriteIntent::Put)
                .collect(),
        };
        summary.puts = intents.iter().filter(|intent| intent.is_put()).count();
        summary.deletes = intents.len() - summary.puts;
        tracing::info!(summary = ?summary, "backups decoded");

        if request.dry_run {
            return Ok(summary);
        }

        match self
            .batch_writer
            .write_chunks(&request.target_table, intents)
            .await
        {
            Ok(chunks_written) => {
                summary.chunks_written = chunks_written;
                tracing::info!(summary = ?summary, "restore finished");
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(summary = ?summary, "restore finished with failed chunks");
                Err(e)
            }
        }
    }

    /// Reads every backup of the source table in key order and decodes its lines.
    async fn read_records<T>(
        &self,
        request: &RestoreRequest,
        summary: &mut RestoreSummary,
        decode: fn(&str, &[u8]) -> DecodedLines<T>,
    ) -> Result<Vec<T>, RestoreError> {
        let keys = self
            .catalog
            .list(&request.prefix, &request.source_table)
            .await?;

        let mut records = Vec::new();
        for key in keys {
            let content = self.catalog.read(&key).await?;
            let decoded = decode(&key, &content);

            summary.objects_read += 1;
            summary.lines_decoded += decoded.records.len();
            summary.lines_skipped += decoded.skipped_lines;
            records.extend(decoded.records);
        }

        Ok(records)
    }
}

pub fn classify(events: Vec<ChangeEvent>) -> Vec<WriteIntent> {
    events.into_iter().map(WriteIntent::from).collect()
}

#[cfg(test)]
mod tests {
    use super::classify;
    use chrono::{TimeZone, Utc};
    use model::attribute_value::{AttributeValue, Item};
    use model::change_event::{ChangeEvent, EventKind};
    use model::write_intent::WriteIntent;
    use std::collections::HashMap;

    fn keys(id: &str) -> Item {
        HashMap::from([("id".to_owned(), AttributeValue::S(id.to_owned()))])
    }

    #[test]
    fn classify_maps_one_intent_per_event() {
        let mut image = keys("1");
        image.insert("total".to_owned(), AttributeValue::N("3".to_owned()));
        let events = vec![
            ChangeEvent::new(
                keys("1"),
                Some(image.clone()),
                None,
                "1".to_owned(),
                None,
                Utc.timestamp_opt(1, 0).unwrap(),
                EventKind::Modify,
            )
            .unwrap(),
            ChangeEvent::new(
                keys("2"),
                None,
                Some(keys("2")),
                "2".to_owned(),
                None,
                Utc.timestamp_opt(2, 0).unwrap(),
                EventKind::Remove,
            )
            .unwrap(),
        ];

        assert_eq!(
            vec![WriteIntent::Put(image), WriteIntent::Delete(keys("2"))],
            classify(events)
        );
    }
}
