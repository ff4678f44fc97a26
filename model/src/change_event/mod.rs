use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::attribute_value::{AttributeValue, Item};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeEventError {
    #[error("change event has no key attributes")]
    MissingKeys,

    #[error("{0} event does not carry a new image")]
    MissingNewImage(EventKind),

    #[error(r#"unknown event name "{0}""#)]
    UnknownEventName(String),
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Insert => "INSERT",
            EventKind::Modify => "MODIFY",
            EventKind::Remove => "REMOVE",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ChangeEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(EventKind::Insert),
            "MODIFY" => Ok(EventKind::Modify),
            "REMOVE" => Ok(EventKind::Remove),
            other => Err(ChangeEventError::UnknownEventName(other.to_owned())),
        }
    }
}

/// Primary-key identity of an item: every key attribute, ordered by attribute name.
///
/// Composite (partition + sort) keys compare on the whole tuple, so two items sharing a
/// partition key but not a sort key never collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdentity(Vec<(String, AttributeValue)>);

impl KeyIdentity {
    pub fn from_keys(keys: &Item) -> Self {
        let mut attributes: Vec<(String, AttributeValue)> = keys
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        attributes.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self(attributes)
    }
}

/// One captured mutation of the source table. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub(crate) keys: Item,
    pub(crate) new_image: Option<Item>,
    pub(crate) old_image: Option<Item>,
    pub(crate) sequence_number: String,
    pub(crate) size_bytes: Option<u64>,
    pub(crate) captured_at: DateTime<Utc>,
    pub(crate) event_kind: EventKind,
}

impl ChangeEvent {
    /// Builds an event, enforcing that keys are never empty and that inserts and
    /// modifications carry the new image of the item.
    pub fn new(
        keys: Item,
        new_image: Option<Item>,
        old_image: Option<Item>,
        sequence_number: String,
        size_bytes: Option<u64>,
        captured_at: DateTime<Utc>,
        event_kind: EventKind,
    ) -> Result<Self, ChangeEventError> {
        if keys.is_empty() {
            return Err(ChangeEventError::MissingKeys);
        }

        if event_kind != EventKind::Remove && new_image.is_none() {
            return Err(ChangeEventError::MissingNewImage(event_kind));
        }

        Ok(Self {
            keys,
            new_image,
            old_image,
            sequence_number,
            size_bytes,
            captured_at,
            event_kind,
        })
    }

    pub fn keys(&self) -> &Item {
        &self.keys
    }

    pub fn new_image(&self) -> Option<&Item> {
        self.new_image.as_ref()
    }

    pub fn old_image(&self) -> Option<&Item> {
        self.old_image.as_ref()
    }

    pub fn sequence_number(&self) -> &str {
        &self.sequence_number
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn event_kind(&self) -> EventKind {
        self.event_kind
    }

    pub fn key_identity(&self) -> KeyIdentity {
        KeyIdentity::from_keys(&self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn item(pairs: &[(&str, &str)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), AttributeValue::S(v.to_string())))
            .collect()
    }

    #[test]
    fn event_without_keys_is_rejected() {
        let result = ChangeEvent::new(
            HashMap::new(),
            Some(item(&[("id", "1")])),
            None,
            "100".to_owned(),
            None,
            Utc.timestamp_opt(10, 0).unwrap(),
            EventKind::Insert,
        );
        assert_eq!(ChangeEventError::MissingKeys, result.unwrap_err());
    }

    #[test]
    fn modify_without_new_image_is_rejected() {
        let result = ChangeEvent::new(
            item(&[("id", "1")]),
            None,
            Some(item(&[("id", "1")])),
            "100".to_owned(),
            None,
            Utc.timestamp_opt(10, 0).unwrap(),
            EventKind::Modify,
        );
        assert_eq!(
            ChangeEventError::MissingNewImage(EventKind::Modify),
            result.unwrap_err()
        );
    }

    #[test]
    fn remove_without_any_image_is_accepted() {
        let event = ChangeEvent::new(
            item(&[("id", "1")]),
            None,
            None,
            "100".to_owned(),
            Some(42),
            Utc.timestamp_opt(10, 0).unwrap(),
            EventKind::Remove,
        )
        .unwrap();
        assert_eq!(EventKind::Remove, event.event_kind());
        assert_eq!(Some(42), event.size_bytes());
    }

    #[test]
    fn key_identity_is_independent_of_attribute_order() {
        let mut first = HashMap::new();
        first.insert("pk".to_owned(), AttributeValue::S("user#1".to_owned()));
        first.insert("sk".to_owned(), AttributeValue::N("3".to_owned()));
        let mut second = HashMap::new();
        second.insert("sk".to_owned(), AttributeValue::N("3".to_owned()));
        second.insert("pk".to_owned(), AttributeValue::S("user#1".to_owned()));

        assert_eq!(KeyIdentity::from_keys(&first), KeyIdentity::from_keys(&second));
    }

    #[test]
    fn composite_keys_differing_in_sort_key_are_distinct() {
        let first = item(&[("pk", "user#1"), ("sk", "a")]);
        let second = item(&[("pk", "user#1"), ("sk", "b")]);
        assert_ne!(KeyIdentity::from_keys(&first), KeyIdentity::from_keys(&second));
    }

    #[test]
    fn event_names_parse_from_wire_values() {
        assert_eq!(EventKind::Insert, "INSERT".parse().unwrap());
        assert_eq!(EventKind::Remove, "REMOVE".parse().unwrap());
        assert_eq!(
            ChangeEventError::UnknownEventName("UPSERT".to_owned()),
            "UPSERT".parse::<EventKind>().unwrap_err()
        );
    }
}
