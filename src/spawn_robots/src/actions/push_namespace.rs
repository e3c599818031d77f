//! PushRosNamespace action implementation

use crate::{
    error::Result,
    substitution::{parse_substitutions, Substitution},
};
use serde::Serialize;

/// Pushes a namespace for the remaining actions of the enclosing group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushRosNamespaceAction {
    pub namespace: Vec<Substitution>,
}

impl PushRosNamespaceAction {
    pub fn new(namespace: &str) -> Result<Self> {
        Ok(Self {
            namespace: parse_substitutions(namespace)?,
        })
    }
}
