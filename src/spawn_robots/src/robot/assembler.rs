//! Robot group assembly
//!
//! Builds, for one robot, the ordered directives the host runtime needs:
//! the templated model description, a state publisher serving it, and a
//! spawner placing the model in the simulator. Later directives refer to
//! the description by name, so the order is fixed.

use super::descriptor::{format_number, RobotGroupDescriptor};
use crate::{
    actions::{
        Directive, GroupAction, LetAction, NodeAction, OutputMode, PushRosNamespaceAction,
        TimerAction,
    },
    error::Result,
    substitution::Substitution,
};

/// Package holding the robot templates and shared configuration
pub const DESCRIPTION_PACKAGE: &str = "hrwros_support";
/// Package holding the per-robot controller configuration
pub const CONTROLLER_CONFIG_PACKAGE: &str = "hrwros_gazebo";
pub const SIMULATOR_PACKAGE: &str = "gazebo_ros";

const TEMPLATE_PROCESSOR: &str = "xacro";
const CONTROLLER_START_DELAY: f64 = 1.0;

/// How a robot group is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLayout {
    /// Directives run in the enclosing namespace
    Flat,
    /// The group first pushes a namespace named after the robot
    Namespaced,
}

#[derive(Debug, Clone)]
pub struct RobotGroupAssembler {
    description_package: String,
    layout: GroupLayout,
}

impl RobotGroupAssembler {
    pub fn new(layout: GroupLayout) -> Self {
        Self {
            description_package: DESCRIPTION_PACKAGE.to_string(),
            layout,
        }
    }

    pub fn with_description_package(mut self, package: impl Into<String>) -> Self {
        self.description_package = package.into();
        self
    }

    /// `<name>_description := $(command 'xacro <template> key:=value ...')`
    pub fn description_command(&self, robot: &RobotGroupDescriptor) -> Result<LetAction> {
        let mut cmd = vec![Substitution::text(format!("{} ", TEMPLATE_PROCESSOR))];
        cmd.push(Substitution::PathJoin(vec![
            vec![Substitution::find_package_share(&self.description_package)],
            vec![Substitution::text("urdf")],
            robot.parse_field("template_file", &robot.template_file)?,
        ]));

        // (template argument, descriptor field, value)
        let mut template_args = vec![
            ("robot_type", "type", robot.robot_type.as_str()),
            ("robot_prefix", "name", robot.name.as_str()),
            ("vacuum_gripper_prefix", "gripper_prefix", robot.gripper_prefix.as_str()),
        ];
        if self.layout == GroupLayout::Namespaced {
            if let Some(parent) = &robot.parent_frame {
                template_args.push(("parent_frame", "parent_frame", parent.as_str()));
            }
        }
        template_args.push((
            "gripper_plugin_name",
            "gripper_plugin_name",
            robot.gripper_plugin_name.as_str(),
        ));

        for (key, field, value) in template_args {
            append(&mut cmd, vec![Substitution::text(format!(" {}:=", key))]);
            append(&mut cmd, robot.parse_field(field, value)?);
        }

        Ok(LetAction::new(
            robot.description_name(),
            vec![Substitution::Command(cmd)],
        ))
    }

    pub fn state_publisher(
        &self,
        robot: &RobotGroupDescriptor,
        description: &LetAction,
    ) -> Result<NodeAction> {
        NodeAction::new("robot_state_publisher", "robot_state_publisher")?
            .with_output(OutputMode::Screen)
            .with_name(&format!("{}_state_publisher", robot.name))?
            .with_parameter("robot_description", description.reference())
            .with_parameter(
                "tf_prefix",
                robot.parse_field("name", &format!("{}_", robot.name))?,
            )
            .with_remapping("/robot_description", &robot.description_topic())
    }

    pub fn joint_state_publisher(&self, robot: &RobotGroupDescriptor) -> Result<NodeAction> {
        let params = Substitution::PathJoin(vec![
            vec![Substitution::find_package_share(&self.description_package)],
            vec![Substitution::text("config")],
            vec![Substitution::text("joint_states.yaml")],
        ]);

        NodeAction::new("joint_state_publisher", "joint_state_publisher")?
            .with_name(&format!("{}_joint_state_publisher", robot.name))?
            .with_param_file(vec![params])
            .with_remapping("/joint_states", &format!("/{}/joint_states", robot.name))?
            .with_remapping("/robot_description", &robot.description_topic())
    }

    pub fn spawner(&self, robot: &RobotGroupDescriptor) -> Result<NodeAction> {
        let mut arguments = vec![
            "-entity".to_string(),
            robot.name.clone(),
            "-topic".to_string(),
            robot.description_topic(),
        ];
        for (flag, value) in robot.pose.spawn_flags() {
            arguments.push(flag.to_string());
            arguments.push(format_number(value));
        }

        NodeAction::new(SIMULATOR_PACKAGE, "spawn_entity.py")?
            .with_output(OutputMode::Screen)
            .with_arguments(arguments)
    }

    /// Arm and joint-state controller spawners, each behind a start delay so
    /// the simulator's controller manager is up first.
    pub fn controller_spawners(&self, robot: &RobotGroupDescriptor) -> Result<Vec<Directive>> {
        let controllers = [
            ("arm", format!("{}_controller", robot.name)),
            ("joint", format!("{}_joint_state_controller", robot.name)),
        ];

        controllers
            .into_iter()
            .map(|(role, controller)| -> Result<Directive> {
                let config = Substitution::PathJoin(vec![
                    vec![Substitution::find_package_share(CONTROLLER_CONFIG_PACKAGE)],
                    vec![Substitution::text("config")],
                    robot.parse_field("name", &format!("{}.yaml", controller))?,
                ]);
                let node = NodeAction::new("controller_manager", "spawner")?
                    .with_name(&format!("{}_{}_controller_spawner", robot.name, role))?
                    .with_arguments([controller.as_str(), "-p"])?
                    .with_argument(vec![config]);
                Ok(Directive::Timer(TimerAction::new(
                    CONTROLLER_START_DELAY,
                    vec![Directive::Node(node)],
                )))
            })
            .collect()
    }

    /// Ordered directives for one robot
    pub fn assemble(&self, robot: &RobotGroupDescriptor) -> Result<Vec<Directive>> {
        robot.validate()?;

        let mut directives = Vec::new();
        if self.layout == GroupLayout::Namespaced {
            directives.push(Directive::PushRosNamespace(PushRosNamespaceAction::new(
                &robot.name,
            )?));
        }

        let description = self.description_command(robot)?;
        let state_publisher = self.state_publisher(robot, &description)?;
        directives.push(Directive::Let(description));
        directives.push(Directive::Node(state_publisher));

        if robot.joint_state_publisher {
            directives.push(Directive::Node(self.joint_state_publisher(robot)?));
        }

        directives.push(Directive::Node(self.spawner(robot)?));

        if robot.controllers {
            directives.extend(self.controller_spawners(robot)?);
        }

        log::debug!(
            "Assembled {} directives for robot '{}'",
            directives.len(),
            robot.name
        );
        Ok(directives)
    }

    pub fn group(&self, robot: &RobotGroupDescriptor) -> Result<GroupAction> {
        Ok(GroupAction::new(self.assemble(robot)?))
    }
}

/// Append substitutions, merging adjacent text
fn append(dst: &mut Vec<Substitution>, src: Vec<Substitution>) {
    for sub in src {
        match (dst.last_mut(), sub) {
            (Some(Substitution::Text(prev)), Substitution::Text(next)) => prev.push_str(&next),
            (_, sub) => dst.push(sub),
        }
    }
}
