use chrono::Utc;
use serde::Deserialize;
use serde_json::Map;

use shared::protocol::DOC_PINS;
use shared::types::Pin;

use crate::store::error::Result;
use crate::store::DashboardStore;

/// Fields a client supplies when pinning a service. Everything except
/// title and url is optional; defaults are applied at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPin {
    pub title: String,
    pub url: String,
    pub group: Option<String>,
    pub desc: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "selectedPort")]
    pub selected_port: Option<u16>,
}

impl DashboardStore {
    pub fn get_pins(&self) -> Vec<Pin> {
        self.docs.load(DOC_PINS, Vec::new())
    }

    /// Append a pin stamped with the current time. Adding a title that is
    /// already pinned is a no-op and returns the list unchanged.
    pub fn add_pin(&self, new: NewPin) -> Result<Vec<Pin>> {
        let mut pins = self.get_pins();

        if !pins.iter().any(|pin| pin.title == new.title) {
            pins.push(Pin {
                title: new.title,
                url: new.url,
                group: new.group.unwrap_or_else(|| "Pinned".to_string()),
                desc: new.desc.unwrap_or_default(),
                tags: new.tags.unwrap_or_else(|| vec!["pinned".to_string()]),
                selected_port: new.selected_port,
                pinned_at: Utc::now(),
                extra: Map::new(),
            });
            self.docs.save(DOC_PINS, &pins)?;
        }

        Ok(pins)
    }

    /// Drop every pin matching the title, reindexing the remainder.
    /// Removing an unknown title is a no-op, not an error.
    pub fn remove_pin(&self, title: &str) -> Result<Vec<Pin>> {
        let pins: Vec<Pin> = self
            .get_pins()
            .into_iter()
            .filter(|pin| pin.title != title)
            .collect();
        self.docs.save(DOC_PINS, &pins)?;
        Ok(pins)
    }

    /// Replace the whole set, ordering included. Unlike `add_pin` this does
    /// not de-duplicate; caller-provided duplicates are stored as-is.
    pub fn sync_pins(&self, pins: Vec<Pin>) -> Result<Vec<Pin>> {
        self.docs.save(DOC_PINS, &pins)?;
        Ok(pins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::store_at;
    use tempfile::tempdir;

    fn new_pin(title: &str) -> NewPin {
        NewPin {
            title: title.to_string(),
            url: format!("http://{}.local", title.to_lowercase()),
            group: None,
            desc: None,
            tags: None,
            selected_port: None,
        }
    }

    #[test]
    fn test_add_pin_applies_defaults() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let pins = store.add_pin(new_pin("Plex")).unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].group, "Pinned");
        assert_eq!(pins[0].tags, vec!["pinned".to_string()]);
    }

    #[test]
    fn test_add_pin_is_idempotent_by_title() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.add_pin(new_pin("Plex")).unwrap();
        let pins = store.add_pin(new_pin("Plex")).unwrap();

        assert_eq!(pins.len(), 1);
        assert_eq!(store.get_pins().len(), 1);
    }

    #[test]
    fn test_remove_pin_reindexes() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.add_pin(new_pin("Plex")).unwrap();
        store.add_pin(new_pin("Grafana")).unwrap();

        let pins = store.remove_pin("Plex").unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].title, "Grafana");
    }

    #[test]
    fn test_remove_unknown_pin_is_noop() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.add_pin(new_pin("Plex")).unwrap();
        let pins = store.remove_pin("Nope").unwrap();
        assert_eq!(pins.len(), 1);
    }

    #[test]
    fn test_remove_pin_drops_every_match() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        // Duplicates can only come in through sync
        let pin = store.add_pin(new_pin("Plex")).unwrap().remove(0);
        store.sync_pins(vec![pin.clone(), pin]).unwrap();

        let pins = store.remove_pin("Plex").unwrap();
        assert!(pins.is_empty());
    }

    #[test]
    fn test_sync_preserves_duplicates() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let pin = store.add_pin(new_pin("Plex")).unwrap().remove(0);
        let synced = store.sync_pins(vec![pin.clone(), pin]).unwrap();

        assert_eq!(synced.len(), 2);
        assert_eq!(store.get_pins().len(), 2);
    }
}
