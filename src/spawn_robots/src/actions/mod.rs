//! Action module

pub mod declare_argument;
pub mod group;
pub mod include;
pub mod let_action;
pub mod node;
pub mod push_namespace;
pub mod timer;

pub use declare_argument::DeclareArgumentAction;
pub use group::GroupAction;
pub use include::IncludeAction;
pub use let_action::LetAction;
pub use node::{NodeAction, OutputMode, Parameter, Remapping};
pub use push_namespace::PushRosNamespaceAction;
pub use timer::TimerAction;

use serde::Serialize;

/// A declarative instruction for the host launch runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Directive {
    DeclareArgument(DeclareArgumentAction),
    Include(IncludeAction),
    Let(LetAction),
    PushRosNamespace(PushRosNamespaceAction),
    Node(NodeAction),
    Timer(TimerAction),
    Group(GroupAction),
}

impl Directive {
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::DeclareArgument(_) => "declare_argument",
            Directive::Include(_) => "include",
            Directive::Let(_) => "let",
            Directive::PushRosNamespace(_) => "push_ros_namespace",
            Directive::Node(_) => "node",
            Directive::Timer(_) => "timer",
            Directive::Group(_) => "group",
        }
    }
}

/// Nodes started by `actions`, descending into groups and timers
pub fn collect_nodes(actions: &[Directive]) -> Vec<&NodeAction> {
    fn walk<'a>(actions: &'a [Directive], nodes: &mut Vec<&'a NodeAction>) {
        for action in actions {
            match action {
                Directive::Node(node) => nodes.push(node),
                Directive::Group(group) => walk(&group.actions, nodes),
                Directive::Timer(timer) => walk(&timer.actions, nodes),
                _ => {}
            }
        }
    }

    let mut nodes = Vec::new();
    walk(actions, &mut nodes);
    nodes
}
