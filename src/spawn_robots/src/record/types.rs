//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root structure for record.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordJson {
    pub node: Vec<NodeRecord>,
    pub include: Vec<IncludeRecord>,
    /// Final values of the declared launch arguments
    pub arguments: BTreeMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Node record structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: String,
    pub name: String,
    pub namespace: String,
    pub output: Option<String>,
    pub params: Vec<(String, String)>,
    pub params_files: Vec<String>,
    pub remaps: Vec<(String, String)>,
    pub args: Option<Vec<String>>,
    pub cmd: Vec<String>,
    /// Seconds to wait before starting, set for nodes behind a timer
    pub start_delay: Option<f64>,
}

/// Included launch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeRecord {
    pub file: String,
    pub args: Vec<(String, String)>,
}
