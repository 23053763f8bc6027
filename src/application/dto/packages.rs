use serde::Serialize;

/// Listing view of one add-on.
#[derive(Debug, Clone, Serialize)]
pub struct AddOnInfo {
    pub name: String,
    pub version: Option<String>,
    pub description: String,
    pub author: Option<String>,
    pub installed: bool,
    pub activated: bool,
    pub compatible: bool,
    pub needs_update: bool,
    pub requirements: Vec<String>,
    pub dependents: Vec<String>,
}
