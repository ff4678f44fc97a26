use crate::attribute_value::Item;
use crate::change_event::{ChangeEvent, EventKind};

/// A resolved put-or-delete directive bound for the target table.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    /// Store the full item, overwriting whatever shares its primary key.
    Put(Item),
    /// Remove the item with this primary-key projection.
    Delete(Item),
}

impl WriteIntent {
    pub fn is_put(&self) -> bool {
        matches!(self, WriteIntent::Put(_))
    }
}

/// Classifies a change event into the write that reproduces it.
///
/// Inserts and modifications become puts of the new image. Removals become deletes of
/// the event's keys, never of the old image.
impl From<ChangeEvent> for WriteIntent {
    fn from(event: ChangeEvent) -> Self {
        match (event.event_kind, event.new_image) {
            (EventKind::Insert | EventKind::Modify, Some(new_image)) => WriteIntent::Put(new_image),
            _ => WriteIntent::Delete(event.keys),
        }
    }
}
