//! Command-line and record generation

use crate::actions::{Directive, IncludeAction, NodeAction};
use crate::error::GenerationError;
use crate::launch::LaunchDescription;
use crate::record::types::{IncludeRecord, NodeRecord, RecordJson};
use crate::substitution::{resolve_substitutions, LaunchContext};

pub struct CommandGenerator;

impl CommandGenerator {
    /// Walk a launch description in order, resolving every directive
    /// against `context`.
    pub fn generate_record(
        description: &LaunchDescription,
        context: &mut LaunchContext,
    ) -> Result<RecordJson, GenerationError> {
        let mut record = RecordJson::new();
        Self::visit(&description.entities, context, None, &mut record)?;
        log::debug!(
            "Generated {} node records and {} includes",
            record.node.len(),
            record.include.len()
        );
        Ok(record)
    }

    fn visit(
        actions: &[Directive],
        context: &mut LaunchContext,
        delay: Option<f64>,
        record: &mut RecordJson,
    ) -> Result<(), GenerationError> {
        for action in actions {
            match action {
                Directive::DeclareArgument(arg) => {
                    arg.apply(context);
                    if let Some(value) = context.get_configuration(&arg.name) {
                        record.arguments.insert(arg.name.clone(), value);
                    }
                }
                Directive::Include(include) => {
                    record
                        .include
                        .push(Self::generate_include_record(include, context)?);
                }
                Directive::Let(let_action) => {
                    let value = resolve_substitutions(&let_action.value, context)?;
                    log::debug!("let {} = {}", let_action.name, value);
                    context.set_configuration(let_action.name.clone(), value);
                }
                Directive::PushRosNamespace(push) => {
                    let namespace = resolve_substitutions(&push.namespace, context)?;
                    context.push_namespace(namespace);
                }
                Directive::Node(node) => {
                    let mut node_record = Self::generate_node_record(node, context)?;
                    node_record.start_delay = delay;
                    record.node.push(node_record);
                }
                Directive::Timer(timer) => {
                    if !timer.period.is_finite() || timer.period < 0.0 {
                        return Err(GenerationError::InvalidPeriod(timer.period));
                    }
                    let total = delay.unwrap_or(0.0) + timer.period;
                    Self::visit(&timer.actions, context, Some(total), record)?;
                }
                Directive::Group(group) => {
                    let mut scoped = context.clone();
                    Self::visit(&group.actions, &mut scoped, delay, record)?;
                }
            }
        }
        Ok(())
    }

    pub fn generate_include_record(
        include: &IncludeAction,
        context: &LaunchContext,
    ) -> Result<IncludeRecord, GenerationError> {
        let file = resolve_substitutions(&include.file, context)?;
        log::info!("Including launch file: {}", file);
        Ok(IncludeRecord {
            file,
            args: Vec::new(),
        })
    }

    pub fn generate_node_record(
        node: &NodeAction,
        context: &LaunchContext,
    ) -> Result<NodeRecord, GenerationError> {
        let cmd = Self::generate_node_command(node, context)?;

        let package = resolve_substitutions(&node.package, context)?;
        let executable = resolve_substitutions(&node.executable, context)?;
        let name = Self::node_name(node, &executable, context)?;
        let namespace = Self::node_namespace(node, context)?;

        let params = node
            .parameters
            .iter()
            .map(|p| Ok((p.name.clone(), resolve_substitutions(&p.value, context)?)))
            .collect::<Result<Vec<_>, GenerationError>>()?;

        let params_files = node
            .param_files
            .iter()
            .map(|f| resolve_substitutions(f, context))
            .collect::<Result<Vec<_>, _>>()?;

        let remaps = node
            .remappings
            .iter()
            .map(|r| {
                let from = resolve_substitutions(&r.from, context)?;
                let to = resolve_substitutions(&r.to, context)?;
                Ok((from, to))
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        let args = if node.arguments.is_empty() {
            None
        } else {
            Some(
                node.arguments
                    .iter()
                    .map(|a| resolve_substitutions(a, context))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

        Ok(NodeRecord {
            executable,
            package,
            name,
            namespace,
            output: node.output.map(|o| o.to_string()),
            params,
            params_files,
            remaps,
            args,
            cmd,
            start_delay: None,
        })
    }

    /// `<exec> [args...] --ros-args -r __node:=<name> -r __ns:=<ns> [-r from:=to]... [-p k:=v]... [--params-file f]...`
    pub fn generate_node_command(
        node: &NodeAction,
        context: &LaunchContext,
    ) -> Result<Vec<String>, GenerationError> {
        let mut cmd = Vec::new();

        // 1. Resolve executable path
        let package = resolve_substitutions(&node.package, context)?;
        let executable = resolve_substitutions(&node.executable, context)?;
        let exec_path = context
            .find_executable(&package, &executable)
            .ok_or_else(|| GenerationError::PackageNotFound(package.clone()))?;
        cmd.push(exec_path.to_string_lossy().into_owned());

        // 2. Positional arguments
        for argument in &node.arguments {
            cmd.push(resolve_substitutions(argument, context)?);
        }

        // 3. ROS args delimiter
        cmd.push("--ros-args".to_string());

        // 4. Node name and namespace
        cmd.push("-r".to_string());
        cmd.push(format!(
            "__node:={}",
            Self::node_name(node, &executable, context)?
        ));
        cmd.push("-r".to_string());
        cmd.push(format!("__ns:={}", Self::node_namespace(node, context)?));

        // 5. Remappings
        for remap in &node.remappings {
            let from = resolve_substitutions(&remap.from, context)?;
            let to = resolve_substitutions(&remap.to, context)?;
            cmd.push("-r".to_string());
            cmd.push(format!("{}:={}", from, to));
        }

        // 6. Parameters
        for param in &node.parameters {
            let value = resolve_substitutions(&param.value, context)?;
            cmd.push("-p".to_string());
            cmd.push(format!("{}:={}", param.name, value));
        }

        // 7. Parameter files
        for file in &node.param_files {
            cmd.push("--params-file".to_string());
            cmd.push(resolve_substitutions(file, context)?);
        }

        Ok(cmd)
    }

    fn node_name(
        node: &NodeAction,
        executable: &str,
        context: &LaunchContext,
    ) -> Result<String, GenerationError> {
        match &node.name {
            Some(name) => Ok(resolve_substitutions(name, context)?),
            None => Ok(executable.to_string()),
        }
    }

    fn node_namespace(
        node: &NodeAction,
        context: &LaunchContext,
    ) -> Result<String, GenerationError> {
        match &node.namespace {
            Some(ns) => Ok(resolve_substitutions(ns, context)?),
            // Use namespace from context (group scoping)
            None => Ok(context.current_namespace()),
        }
    }
}
