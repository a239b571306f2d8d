//! Chronicle log policy: newest entries first, capped length.

use uuid::Uuid;

use super::types::{ActivityEntry, ActivityKind};

/// Maximum number of chronicle entries retained in a profile.
pub const CHRONICLE_CAP: usize = 50;

pub fn visit_text(district_name: &str) -> String {
    format!("You successfully entered the {} district.", district_name)
}

pub fn purchase_text(item_name: &str) -> String {
    format!("Acquired \"{}\" from the central market.", item_name)
}

/// New entry with a fresh opaque id.
pub fn new_entry(kind: ActivityKind, text: impl Into<String>, timestamp: i64) -> ActivityEntry {
    ActivityEntry {
        id: Uuid::new_v4().simple().to_string(),
        timestamp,
        kind,
        text: text.into(),
    }
}

/// Prepend `entry` and evict from the tail until at most [`CHRONICLE_CAP`] remain.
pub fn prepend(chronicles: &mut Vec<ActivityEntry>, entry: ActivityEntry) {
    chronicles.insert(0, entry);
    chronicles.truncate(CHRONICLE_CAP);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_keeps_newest_first_and_caps() {
        let mut log = Vec::new();
        for i in 0..(CHRONICLE_CAP as i64 + 7) {
            prepend(&mut log, new_entry(ActivityKind::Social, format!("e{}", i), i));
        }
        assert_eq!(log.len(), CHRONICLE_CAP);
        assert_eq!(log[0].text, format!("e{}", CHRONICLE_CAP + 6));
        assert_eq!(log[CHRONICLE_CAP - 1].text, "e7");
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = new_entry(ActivityKind::Discovery, "a", 1);
        let b = new_entry(ActivityKind::Discovery, "a", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn texts_match_market_and_map_wording() {
        assert_eq!(visit_text("Neo-Oasis"), "You successfully entered the Neo-Oasis district.");
        assert_eq!(
            purchase_text("Void Walkers"),
            "Acquired \"Void Walkers\" from the central market."
        );
    }
}
