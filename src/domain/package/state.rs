use serde::{Deserialize, Serialize};

/// Persistent lifecycle state of one add-on, kept in the project config
/// under `addons/<vendor/name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnState {
    #[serde(default)]
    pub install: bool,
    #[serde(default)]
    pub status: bool,
    /// Version recorded on the last install or update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl AddOnState {
    pub fn is_installed(&self) -> bool {
        self.install
    }

    pub fn is_activated(&self) -> bool {
        self.install && self.status
    }
}
