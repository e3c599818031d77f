//! Include action implementation

use crate::substitution::Substitution;
use serde::Serialize;

/// Include action representing a nested launch file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeAction {
    pub file: Vec<Substitution>,
}

impl IncludeAction {
    pub fn new(file: Vec<Substitution>) -> Self {
        Self { file }
    }
}
