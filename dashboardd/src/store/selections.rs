use std::collections::BTreeMap;

use shared::protocol::{DOC_CUSTOM_PORTS, DOC_PORT_SELECTIONS};
use shared::types::CustomPort;

use crate::store::error::{Result, StoreError};
use crate::store::DashboardStore;

/// Service title -> chosen port
pub type PortSelections = BTreeMap<String, u16>;

impl DashboardStore {
    pub fn get_port_selections(&self) -> PortSelections {
        self.docs.load(DOC_PORT_SELECTIONS, PortSelections::new())
    }

    /// Full replacement; there is no partial update. A client changing one
    /// entry resends the complete map.
    pub fn sync_port_selections(&self, selections: PortSelections) -> Result<()> {
        self.docs.save(DOC_PORT_SELECTIONS, &selections)
    }

    pub fn get_custom_ports(&self) -> Vec<CustomPort> {
        self.docs.load(DOC_CUSTOM_PORTS, Vec::new())
    }

    /// Validate the whole batch before any write; one out-of-range entry
    /// rejects everything.
    pub fn save_custom_ports(&self, ports: Vec<CustomPort>) -> Result<()> {
        for entry in &ports {
            if entry.port == 0 || entry.port > 65535 {
                return Err(StoreError::Validation(format!(
                    "Port {} is out of range (1-65535)",
                    entry.port
                )));
            }
        }
        self.docs.save(DOC_CUSTOM_PORTS, &ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::store_at;
    use serde_json::Map;
    use tempfile::tempdir;

    fn port(port: u32) -> CustomPort {
        CustomPort {
            port,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_sync_replaces_never_merges() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut first = PortSelections::new();
        first.insert("A".to_string(), 80);
        store.sync_port_selections(first).unwrap();

        let mut second = PortSelections::new();
        second.insert("B".to_string(), 443);
        store.sync_port_selections(second).unwrap();

        let stored = store.get_port_selections();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("B"), Some(&443));
        assert!(!stored.contains_key("A"));
    }

    #[test]
    fn test_custom_port_out_of_range_rejects_batch() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let result = store.save_custom_ports(vec![port(8080), port(70000)]);
        assert!(matches!(result, Err(StoreError::Validation(_))));

        // Nothing was written
        assert!(store.get_custom_ports().is_empty());
    }

    #[test]
    fn test_custom_port_zero_rejected() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let result = store.save_custom_ports(vec![port(0)]);
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_custom_port_valid_batch_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.save_custom_ports(vec![port(8080), port(65535)]).unwrap();
        let stored = store.get_custom_ports();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].port, 8080);
    }
}
