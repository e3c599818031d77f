//! Let action implementation

use crate::substitution::Substitution;
use serde::Serialize;

/// Let action binding a launch configuration that later actions reference
/// through `$(var name)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetAction {
    pub name: String,
    pub value: Vec<Substitution>,
}

impl LetAction {
    pub fn new(name: impl Into<String>, value: Vec<Substitution>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Substitution that reads this binding back
    pub fn reference(&self) -> Vec<Substitution> {
        vec![Substitution::var(self.name.clone())]
    }
}
