//! Declare argument action for launch argument metadata

use crate::substitution::LaunchContext;
use serde::Serialize;

/// Declare argument action with metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclareArgumentAction {
    pub name: String,
    pub default: Option<String>,
}

impl DeclareArgumentAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Apply the declared default unless a value is already set (CLI overrides win)
    pub fn apply(&self, context: &mut LaunchContext) {
        if context.get_configuration(&self.name).is_some() {
            return;
        }

        if let Some(default) = &self.default {
            context.set_configuration(self.name.clone(), default.clone());
        } else {
            log::debug!("Launch argument '{}' has no default and no value", self.name);
        }
    }
}
