use std::collections::BTreeMap;

use shared::protocol::{DEFAULT_CATEGORIES, DOC_ASSIGNMENTS, DOC_CATEGORIES, DOC_SERVICES};
use shared::types::Service;

use crate::store::error::Result;
use crate::store::DashboardStore;

/// Category key -> display name
pub type Categories = BTreeMap<String, String>;

/// Service title -> category key
pub type Assignments = BTreeMap<String, String>;

pub fn default_categories() -> Categories {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(key, name)| (key.to_string(), name.to_string()))
        .collect()
}

impl DashboardStore {
    /// Category dictionary, seeded with the defaults when missing or empty
    pub fn get_categories(&self) -> Categories {
        let categories: Categories = self.docs.load(DOC_CATEGORIES, Categories::new());
        if categories.is_empty() {
            default_categories()
        } else {
            categories
        }
    }

    pub fn save_categories(&self, categories: Categories) -> Result<()> {
        self.docs.save(DOC_CATEGORIES, &categories)
    }

    /// Restore the default dictionary and drop every assignment
    pub fn reset_categories(&self) -> Result<Categories> {
        let defaults = default_categories();
        self.docs.save(DOC_CATEGORIES, &defaults)?;
        self.docs.save(DOC_ASSIGNMENTS, &Assignments::new())?;
        Ok(defaults)
    }

    pub fn get_assignments(&self) -> Assignments {
        self.docs.load(DOC_ASSIGNMENTS, Assignments::new())
    }

    pub fn save_assignments(&self, assignments: Assignments) -> Result<()> {
        self.docs.save(DOC_ASSIGNMENTS, &assignments)
    }

    pub fn get_services(&self) -> Vec<Service> {
        self.docs.load(DOC_SERVICES, Vec::new())
    }

    /// Merge the current category assignments into the incoming list and
    /// persist it to the data directory and the legacy location. The merge
    /// happens only here; saving categories or assignments alone never
    /// rewrites stored services.
    pub fn save_services(&self, services: Vec<Service>) -> Result<Vec<Service>> {
        let categories = self.get_categories();
        let assignments = self.get_assignments();

        let merged: Vec<Service> = services
            .into_iter()
            .map(|service| apply_assignment(service, &assignments, &categories))
            .collect();

        self.docs.save(DOC_SERVICES, &merged)?;
        self.export_legacy_services(&merged)?;

        Ok(merged)
    }

    /// Compatibility copy for clients that still read the old location
    pub fn export_legacy_services(&self, services: &[Service]) -> Result<()> {
        self.legacy.save(DOC_SERVICES, &services)
    }

    /// Remove every service with the given title from both storage
    /// locations. Returns true when either location contained it.
    pub(crate) fn remove_service_everywhere(&self, title: &str) -> Result<bool> {
        let mut removed = false;

        for docs in [&self.docs, &self.legacy] {
            let services: Vec<Service> = docs.load(DOC_SERVICES, Vec::new());
            let before = services.len();
            let filtered: Vec<Service> =
                services.into_iter().filter(|s| s.title != title).collect();
            if filtered.len() != before {
                docs.save(DOC_SERVICES, &filtered)?;
                removed = true;
            }
        }

        Ok(removed)
    }
}

/// Resolve the display group for one service. With an assignment present,
/// the category dictionary wins; an unknown key falls back to the service's
/// own group, then to "Other". Without an assignment the service is
/// untouched.
fn apply_assignment(
    mut service: Service,
    assignments: &Assignments,
    categories: &Categories,
) -> Service {
    if let Some(key) = assignments.get(&service.title) {
        let group = categories
            .get(key)
            .cloned()
            .or_else(|| service.group.clone())
            .unwrap_or_else(|| "Other".to_string());
        service.group = Some(group);
    }
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::store_at;
    use serde_json::json;
    use tempfile::tempdir;

    fn service(title: &str, group: Option<&str>) -> Service {
        Service {
            title: title.to_string(),
            url: format!("http://{}.local", title.to_lowercase()),
            group: group.map(|g| g.to_string()),
            desc: String::new(),
            tags: vec![],
            selected_port: None,
            pinned_at: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_categories_seed_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let categories = store.get_categories();
        assert_eq!(categories.len(), 10);
        assert_eq!(categories["nas"], "NAS & Storage");
        assert_eq!(categories["network"], "Network");
    }

    #[test]
    fn test_save_categories_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut categories = Categories::new();
        categories.insert("lab".to_string(), "Lab".to_string());
        store.save_categories(categories.clone()).unwrap();

        assert_eq!(store.get_categories(), categories);
    }

    #[test]
    fn test_reset_categories_clears_assignments() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut assignments = Assignments::new();
        assignments.insert("Plex".to_string(), "media".to_string());
        store.save_assignments(assignments).unwrap();

        store.reset_categories().unwrap();

        assert!(store.get_assignments().is_empty());
        assert_eq!(store.get_categories(), default_categories());
    }

    #[test]
    fn test_merge_applies_assigned_category_name() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut categories = Categories::new();
        categories.insert("nas".to_string(), "NAS & Storage".to_string());
        store.save_categories(categories).unwrap();

        let mut assignments = Assignments::new();
        assignments.insert("Plex".to_string(), "nas".to_string());
        store.save_assignments(assignments).unwrap();

        let merged = store.save_services(vec![service("Plex", Some("Media"))]).unwrap();
        assert_eq!(merged[0].group.as_deref(), Some("NAS & Storage"));

        let stored = store.get_services();
        assert_eq!(stored[0].group.as_deref(), Some("NAS & Storage"));
    }

    #[test]
    fn test_merge_unknown_key_keeps_existing_group() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut assignments = Assignments::new();
        assignments.insert("Plex".to_string(), "no-such-key".to_string());
        store.save_assignments(assignments).unwrap();

        let merged = store.save_services(vec![service("Plex", Some("Media"))]).unwrap();
        assert_eq!(merged[0].group.as_deref(), Some("Media"));
    }

    #[test]
    fn test_merge_unknown_key_without_group_falls_back_to_other() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut assignments = Assignments::new();
        assignments.insert("Plex".to_string(), "no-such-key".to_string());
        store.save_assignments(assignments).unwrap();

        let merged = store.save_services(vec![service("Plex", None)]).unwrap();
        assert_eq!(merged[0].group.as_deref(), Some("Other"));
    }

    #[test]
    fn test_unassigned_service_is_untouched() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let merged = store.save_services(vec![service("Grafana", Some("Monitoring"))]).unwrap();
        assert_eq!(merged[0].group.as_deref(), Some("Monitoring"));
    }

    #[test]
    fn test_save_services_writes_legacy_copy() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        store.save_services(vec![service("Plex", Some("Media"))]).unwrap();

        let legacy: Vec<Service> = store.legacy.load(DOC_SERVICES, Vec::new());
        assert_eq!(legacy, store.get_services());
    }

    #[test]
    fn test_unknown_service_fields_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        let mut svc = service("Plex", Some("Media"));
        svc.extra.insert("icon".to_string(), json!("plex.png"));

        store.save_services(vec![svc]).unwrap();

        let stored = store.get_services();
        assert_eq!(stored[0].extra["icon"], json!("plex.png"));
    }
}
