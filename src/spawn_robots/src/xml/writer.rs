//! ROS 2 XML launch file rendering

use crate::{
    actions::{Directive, NodeAction},
    launch::LaunchDescription,
    robot::format_number,
    substitution::render_substitutions,
};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Minimal element tree; attributes keep insertion order
#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    fn opt_attr(self, name: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        let _ = write!(out, "{}<{}", indent, self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push_str(">\n");
        for child in &self.children {
            child.write_to(out, depth + 1);
        }
        let _ = writeln!(out, "{}</{}>", indent, self.name);
    }
}

/// Render a launch description as a `.launch.xml` document
pub fn to_launch_xml(description: &LaunchDescription) -> String {
    let root = description
        .entities
        .iter()
        .fold(Element::new("launch"), |root, d| root.child(directive_element(d)));

    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    root.write_to(&mut out, 0);
    out
}

fn directive_element(directive: &Directive) -> Element {
    match directive {
        Directive::DeclareArgument(arg) => Element::new("arg")
            .attr("name", arg.name.clone())
            .opt_attr("default", arg.default.clone()),
        Directive::Include(include) => {
            Element::new("include").attr("file", render_substitutions(&include.file))
        }
        Directive::Let(let_action) => Element::new("let")
            .attr("name", let_action.name.clone())
            .attr("value", render_substitutions(&let_action.value)),
        Directive::PushRosNamespace(push) => Element::new("push_ros_namespace")
            .attr("namespace", render_substitutions(&push.namespace)),
        Directive::Node(node) => node_element(node),
        Directive::Timer(timer) => timer.actions.iter().fold(
            Element::new("timer").attr("period", format_number(timer.period)),
            |element, d| element.child(directive_element(d)),
        ),
        Directive::Group(group) => group
            .actions
            .iter()
            .fold(Element::new("group"), |element, d| {
                element.child(directive_element(d))
            }),
    }
}

fn node_element(node: &NodeAction) -> Element {
    let args = if node.arguments.is_empty() {
        None
    } else {
        Some(
            node.arguments
                .iter()
                .map(|a| render_substitutions(a))
                .collect::<Vec<_>>()
                .join(" "),
        )
    };

    let mut element = Element::new("node")
        .attr("pkg", render_substitutions(&node.package))
        .attr("exec", render_substitutions(&node.executable))
        .opt_attr("name", node.name.as_deref().map(render_substitutions))
        .opt_attr("namespace", node.namespace.as_deref().map(render_substitutions))
        .opt_attr("output", node.output.map(|o| o.to_string()))
        .opt_attr("args", args);

    for param in &node.parameters {
        element = element.child(
            Element::new("param")
                .attr("name", param.name.clone())
                .attr("value", render_substitutions(&param.value)),
        );
    }
    for file in &node.param_files {
        element = element.child(Element::new("param").attr("from", render_substitutions(file)));
    }
    for remap in &node.remappings {
        element = element.child(
            Element::new("remap")
                .attr("from", render_substitutions(&remap.from))
                .attr("to", render_substitutions(&remap.to)),
        );
    }
    element
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
