//! Group action implementation

use super::Directive;
use serde::Serialize;

/// Group action; namespace pushes and lets inside it stay inside it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAction {
    pub actions: Vec<Directive>,
}

impl GroupAction {
    pub fn new(actions: Vec<Directive>) -> Self {
        Self { actions }
    }

    /// Flatten nested groups and timers into the nodes they eventually start
    pub fn nodes(&self) -> Vec<&super::NodeAction> {
        super::collect_nodes(&self.actions)
    }
}
