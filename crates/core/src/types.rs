use serde::{Deserialize, Serialize};

/// One row of the System tab: a label and its display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemProperty {
    pub label: String,
    pub value: String,
}

impl SystemProperty {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Snapshot of a single process as shown in the Processes tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
    pub status: String,
}

/// An installed package parsed from `pkg info` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub description: String,
}

/// A ZFS snapshot row: name plus the human-readable creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub created: String,
}

/// A boot environment row parsed from `beadm list -H`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootEnvironment {
    pub name: String,
    /// Activation flags as beadm prints them (`N`, `R`, `NR`, `-`).
    pub active: String,
    pub mountpoint: String,
    pub space: String,
    pub created: String,
}

/// One entry of the Settings tab, persisted as JSON.
///
/// The command text is mutable: after a run it is replaced by whatever was
/// actually executed (possibly sudo-prefixed) and the whole list is written
/// back to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub description: String,
    pub command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_roundtrips_through_json() {
        let setting = Setting {
            name: "Update packages".to_string(),
            description: "Fetch and apply package updates".to_string(),
            command: "pkg upgrade -y".to_string(),
        };
        let json = serde_json::to_string(&setting).unwrap();
        let back: Setting = serde_json::from_str(&json).unwrap();
        assert_eq!(setting, back);
    }

    #[test]
    fn setting_accepts_plain_object() {
        let raw = r#"{"name":"a","description":"b","command":"c"}"#;
        let setting: Setting = serde_json::from_str(raw).unwrap();
        assert_eq!(setting.command, "c");
    }
}
