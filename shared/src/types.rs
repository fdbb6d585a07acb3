use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A service shown on the dashboard.
/// This is the canonical data model shared by the daemon, the API, and the
/// scan parser that discovers services on the network.
///
/// The scanner attaches fields the dashboard does not model (icons, probe
/// details); `extra` captures them so they survive a read-modify-write cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Display title, unique within a service list
    pub title: String,

    /// Service URL, e.g. "http://nas.local:5000"
    pub url: String,

    /// Display group. Derived from the category assignment when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Free-form description
    #[serde(default)]
    pub desc: String,

    /// Tags, e.g. ["docker", "media"]
    #[serde(default)]
    pub tags: Vec<String>,

    /// Port the user picked when the service exposes several
    #[serde(rename = "selectedPort", default, skip_serializing_if = "Option::is_none")]
    pub selected_port: Option<u16>,

    /// Set when the service was stored via the pin registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pinned shortcut. Same shape as a service, but `pinned_at` is always
/// present and defaults are applied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub title: String,

    pub url: String,

    #[serde(default = "default_pin_group")]
    pub group: String,

    #[serde(default)]
    pub desc: String,

    #[serde(default = "default_pin_tags")]
    pub tags: Vec<String>,

    #[serde(rename = "selectedPort", default, skip_serializing_if = "Option::is_none")]
    pub selected_port: Option<u16>,

    pub pinned_at: DateTime<Utc>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_pin_group() -> String {
    "Pinned".to_string()
}

fn default_pin_tags() -> Vec<String> {
    vec!["pinned".to_string()]
}

/// A user-defined port entry. `port` is wider than u16 on the wire so an
/// out-of-range value reaches validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPort {
    pub port: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Observable scan states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Idle,
    Running,
    Success,
    Error,
}

/// Progress record written by the external scanner and read by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub status: ScanStatus,

    /// Percent complete, 0-100
    #[serde(default)]
    pub progress: u8,

    #[serde(default)]
    pub message: String,

    /// Absent when the scanner never stamped the record; the staleness
    /// check is skipped in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ScanProgress {
    /// A synthesized record for states the daemon reports itself
    /// (no file, stale file, corrupt file).
    pub fn synthesized(status: ScanStatus, message: &str) -> Self {
        Self {
            status,
            progress: 0,
            message: message.to_string(),
            timestamp: Some(Utc::now()),
        }
    }
}
