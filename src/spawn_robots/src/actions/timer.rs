//! Timer action implementation

use super::Directive;
use serde::Serialize;

/// Delays the start of the wrapped actions by `period` seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerAction {
    pub period: f64,
    pub actions: Vec<Directive>,
}

impl TimerAction {
    pub fn new(period: f64, actions: Vec<Directive>) -> Self {
        Self { period, actions }
    }
}
