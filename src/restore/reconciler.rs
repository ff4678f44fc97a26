use std::collections::hash_map::Entry;
use std::collections::HashMap;

use model::change_event::{ChangeEvent, KeyIdentity};

/// Reduces change events to the latest captured event per primary key.
///
/// Events are stably sorted by capture time, then walked in that order while tracking
/// where the current survivor for each key sits. A later event replaces the survivor
/// in place, so equal capture times resolve to whichever came last in the input.
///
/// Capture time only orders events within a shard reliably. Events for the same key
/// captured in the same second on different shards may resolve in input order rather
/// than true change order.
pub fn reconcile(mut events: Vec<ChangeEvent>) -> Vec<ChangeEvent> {
    events.sort_by_key(ChangeEvent::captured_at);

    let mut positions: HashMap<KeyIdentity, usize> = HashMap::with_capacity(events.len());
    let mut survivors: Vec<ChangeEvent> = Vec::with_capacity(events.len());

    for event in events {
        match positions.entry(event.key_identity()) {
            Entry::Occupied(position) => survivors[*position.get()] = event,
            Entry::Vacant(position) => {
                position.insert(survivors.len());
                survivors.push(event);
            }
        }
    }

    survivors
}

#[cfg(test)]
mod tests {
    use super::reconcile;
    use chrono::{TimeZone, Utc};
    use model::attribute_value::{AttributeValue, Item};
    use model::change_event::{ChangeEvent, EventKind};
    use std::collections::HashMap;

    fn item(pairs: &[(&str, &str)]) -> Item {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
            .collect::<HashMap<_, _>>()
    }

    fn event(keys: Item, kind: EventKind, at: i64, sequence: &str) -> ChangeEvent {
        let new_image = match kind {
            EventKind::Remove => None,
            _ => Some(keys.clone()),
        };
        ChangeEvent::new(
            keys,
            new_image,
            None,
            sequence.to_owned(),
            None,
            Utc.timestamp_opt(at, 0).unwrap(),
            kind,
        )
        .unwrap()
    }

    #[test]
    fn later_remove_wins_over_earlier_insert() {
        let events = vec![
            event(item(&[("id", "1")]), EventKind::Remove, 10, "2"),
            event(item(&[("id", "1")]), EventKind::Insert, 5, "1"),
        ];

        let survivors = reconcile(events);

        assert_eq!(1, survivors.len());
        assert_eq!(EventKind::Remove, survivors[0].event_kind());
    }

    #[test]
    fn latest_capture_time_survives_per_key() {
        let events = vec![
            event(item(&[("id", "1")]), EventKind::Modify, 30, "c"),
            event(item(&[("id", "2")]), EventKind::Insert, 1, "d"),
            event(item(&[("id", "1")]), EventKind::Insert, 10, "a"),
            event(item(&[("id", "1")]), EventKind::Modify, 20, "b"),
        ];

        let survivors = reconcile(events);

        assert_eq!(2, survivors.len());
        let first = survivors
            .iter()
            .find(|e| e.keys() == &item(&[("id", "1")]))
            .unwrap();
        assert_eq!("c", first.sequence_number());
    }

    #[test]
    fn ties_resolve_to_last_in_input_order() {
        let events = vec![
            event(item(&[("id", "1")]), EventKind::Insert, 10, "first"),
            event(item(&[("id", "1")]), EventKind::Modify, 10, "second"),
        ];

        let survivors = reconcile(events);

        assert_eq!(1, survivors.len());
        assert_eq!("second", survivors[0].sequence_number());
    }

    #[test]
    fn events_without_collisions_are_kept() {
        let events = vec![
            event(item(&[("id", "3")]), EventKind::Insert, 3, "3"),
            event(item(&[("id", "1")]), EventKind::Insert, 1, "1"),
            event(item(&[("id", "2")]), EventKind::Remove, 2, "2"),
        ];

        let mut survivors: Vec<String> = reconcile(events.clone())
            .iter()
            .map(|e| e.sequence_number().to_owned())
            .collect();
        survivors.sort();

        assert_eq!(vec!["1", "2", "3"], survivors);
    }

    #[test]
    fn composite_keys_sharing_a_partition_stay_distinct() {
        let events = vec![
            event(
                item(&[("customer", "c1"), ("order", "o1")]),
                EventKind::Insert,
                1,
                "1",
            ),
            event(
                item(&[("customer", "c1"), ("order", "o2")]),
                EventKind::Insert,
                2,
                "2",
            ),
            event(
                item(&[("order", "o1"), ("customer", "c1")]),
                EventKind::Remove,
                3,
                "3",
            ),
        ];

        let survivors = reconcile(events);

        assert_eq!(2, survivors.len());
        let removed = survivors
            .iter()
            .find(|e| e.event_kind() == EventKind::Remove)
            .unwrap();
        assert_eq!(Some(&AttributeValue::S("o1".to_owned())), removed.keys().get("order"));
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(reconcile(vec![]).is_empty());
    }
}
