use shared::protocol::DOC_DELETED_SERVICES;

use crate::store::error::{Result, StoreError};
use crate::store::DashboardStore;

impl DashboardStore {
    pub fn get_deleted_services(&self) -> Vec<String> {
        self.docs.load(DOC_DELETED_SERVICES, Vec::new())
    }

    /// Replace the suppression list. Only the shape is validated; duplicate
    /// titles are stored as-is.
    pub fn save_deleted_services(&self, deleted: Vec<String>) -> Result<()> {
        self.docs.save(DOC_DELETED_SERVICES, &deleted)
    }

    pub fn clear_deleted_services(&self) -> Result<()> {
        self.docs.save(DOC_DELETED_SERVICES, &Vec::<String>::new())
    }

    /// Record the title so rediscovery will not resurrect it, then remove
    /// it from both service lists. `NotFound` when neither list had it.
    pub fn delete_service(&self, title: &str) -> Result<()> {
        let mut deleted = self.get_deleted_services();
        deleted.push(title.to_string());
        self.docs.save(DOC_DELETED_SERVICES, &deleted)?;

        if self.remove_service_everywhere(title)? {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!(
                "Service '{title}' not found"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::store_at;
    use shared::protocol::DOC_SERVICES;
    use shared::types::Service;
    use tempfile::tempdir;

    fn service(title: &str) -> Service {
        Service {
            title: title.to_string(),
            url: format!("http://{}.local", title.to_lowercase()),
            group: None,
            desc: String::new(),
            tags: vec![],
            selected_port: None,
            pinned_at: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_save_keeps_duplicates() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store
            .save_deleted_services(vec!["Plex".to_string(), "Plex".to_string()])
            .unwrap();
        assert_eq!(store.get_deleted_services().len(), 2);
    }

    #[test]
    fn test_clear_empties_list() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.save_deleted_services(vec!["Plex".to_string()]).unwrap();
        store.clear_deleted_services().unwrap();
        assert!(store.get_deleted_services().is_empty());
    }

    #[test]
    fn test_delete_service_removes_from_both_stores() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.save_services(vec![service("Plex"), service("Grafana")]).unwrap();

        store.delete_service("Plex").unwrap();

        let remaining = store.get_services();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Grafana");

        let legacy: Vec<Service> = store.legacy.load(DOC_SERVICES, Vec::new());
        assert_eq!(legacy.len(), 1);

        assert_eq!(store.get_deleted_services(), vec!["Plex".to_string()]);
    }

    #[test]
    fn test_delete_service_found_in_one_store_succeeds() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        // Present only in the legacy copy
        store.legacy.save(DOC_SERVICES, &vec![service("Plex")]).unwrap();

        store.delete_service("Plex").unwrap();

        let legacy: Vec<Service> = store.legacy.load(DOC_SERVICES, Vec::new());
        assert!(legacy.is_empty());
    }

    #[test]
    fn test_delete_unknown_service_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let result = store.delete_service("Nope");
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        // The suppression entry is still recorded
        assert_eq!(store.get_deleted_services(), vec!["Nope".to_string()]);
    }
}
