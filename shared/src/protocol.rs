/// Document names shared between the daemon and the external scan parser.
/// Each name maps to `<name>.json` inside the configured data directory.
pub const DOC_CATEGORIES: &str = "categories";
pub const DOC_ASSIGNMENTS: &str = "service-assignments";
pub const DOC_SERVICES: &str = "services";
pub const DOC_CUSTOM_PORTS: &str = "custom-ports";
pub const DOC_DELETED_SERVICES: &str = "deleted-services";
pub const DOC_PINS: &str = "pins";
pub const DOC_PORT_SELECTIONS: &str = "port-selections";
pub const DOC_SCAN_PROGRESS: &str = "scan-progress";

/// Category keys and display names used to seed an empty dictionary.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("network", "Network"),
    ("media", "Media"),
    ("home-automation", "Home Automation"),
    ("web-service", "Web Service"),
    ("server", "Server"),
    ("development", "Development"),
    ("monitoring", "Monitoring"),
    ("nas", "NAS & Storage"),
    ("ai", "AI & Machine Learning"),
    ("other", "Other"),
];

/// API path prefix
pub const API_PREFIX: &str = "/api";
