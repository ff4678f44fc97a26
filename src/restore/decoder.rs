use chrono::{DateTime, TimeZone, Utc};
use model::attribute_value::Item;
use model::change_event::{ChangeEvent, ChangeEventError, EventKind};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed change record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("change record has no key attributes")]
    MissingKeys,

    #[error("exported item has no attributes")]
    EmptyItem,

    #[error("{0} record does not carry a new image")]
    MissingNewImage(EventKind),

    #[error(r#"unknown event name "{0}""#)]
    UnknownEventName(String),

    #[error("capture time {0} is not a valid epoch-seconds timestamp")]
    InvalidTimestamp(i64),
}

impl From<ChangeEventError> for DecodeError {
    fn from(e: ChangeEventError) -> Self {
        match e {
            ChangeEventError::MissingKeys => DecodeError::MissingKeys,
            ChangeEventError::MissingNewImage(kind) => DecodeError::MissingNewImage(kind),
            ChangeEventError::UnknownEventName(name) => DecodeError::UnknownEventName(name),
        }
    }
}

/// One line of a backup object as it sits on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeRecordDto {
    #[serde(default)]
    keys: Item,
    new_image: Option<Item>,
    old_image: Option<Item>,
    #[serde(default)]
    sequence_number: String,
    size_bytes: Option<u64>,
    approximate_creation_date_time: i64,
    #[serde(rename = "eventName")]
    event_name: String,
}

/// The capture time is stored as whole seconds since the epoch.
fn captured_at(epoch_seconds: i64) -> Result<DateTime<Utc>, DecodeError> {
    Utc.timestamp_opt(epoch_seconds, 0)
        .single()
        .ok_or(DecodeError::InvalidTimestamp(epoch_seconds))
}

pub fn decode_line(line: &[u8]) -> Result<ChangeEvent, DecodeError> {
    let record: ChangeRecordDto = serde_json::from_slice(line)?;
    let event_kind = record.event_name.parse::<EventKind>()?;
    let captured_at = captured_at(record.approximate_creation_date_time)?;

    Ok(ChangeEvent::new(
        record.keys,
        record.new_image,
        record.old_image,
        record.sequence_number,
        record.size_bytes,
        captured_at,
        event_kind,
    )?)
}

/// Decodes one line of a table export: a bare item in the same tagged attribute format.
pub fn decode_item_line(line: &[u8]) -> Result<Item, DecodeError> {
    let item: Item = serde_json::from_slice(line)?;
    if item.is_empty() {
        return Err(DecodeError::EmptyItem);
    }
    Ok(item)
}

/// Records decoded from one backup object.
#[derive(Debug)]
pub struct DecodedLines<T> {
    pub records: Vec<T>,
    pub skipped_lines: usize,
}

/// Decodes every line of a change log object.
pub fn decode_backup(key: &str, content: &[u8]) -> DecodedLines<ChangeEvent> {
    decode_lines(key, content, decode_line)
}

/// Decodes every line of a table export object.
pub fn decode_item_export(key: &str, content: &[u8]) -> DecodedLines<Item> {
    decode_lines(key, content, decode_item_line)
}

/// Blank lines are ignored; a line that fails to decode is logged and skipped so one
/// corrupt record never discards the whole object.
fn decode_lines<T>(
    key: &str,
    content: &[u8],
    decode: impl Fn(&[u8]) -> Result<T, DecodeError>,
) -> DecodedLines<T> {
    let mut decoded = DecodedLines {
        records: Vec::new(),
        skipped_lines: 0,
    };

    for (index, line) in content.split(|byte| *byte == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match decode(line) {
            Ok(record) => decoded.records.push(record),
            Err(e) => {
                tracing::warn!(key = ?key, line = index + 1, error = %e, "skipping backup record");
                decoded.skipped_lines += 1;
            }
        }
    }

    tracing::debug!(
        key = ?key,
        records = decoded.records.len(),
        skipped = decoded.skipped_lines,
        "backup decoded"
    );
    decoded
}
