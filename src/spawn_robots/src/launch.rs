//! Top-level launch descriptions

use crate::{
    actions::{collect_nodes, DeclareArgumentAction, Directive, IncludeAction, NodeAction},
    error::Result,
    robot::{
        assembler::SIMULATOR_PACKAGE, GroupLayout, Pose, RobotGroupAssembler,
        RobotGroupDescriptor, RobotsConfig,
    },
    substitution::Substitution,
};
use serde::Serialize;

/// Ordered directive list handed to the host runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchDescription {
    pub entities: Vec<Directive>,
}

impl LaunchDescription {
    pub fn new(entities: Vec<Directive>) -> Self {
        Self { entities }
    }

    pub fn push(&mut self, directive: Directive) {
        self.entities.push(directive);
    }

    pub fn extend(&mut self, directives: impl IntoIterator<Item = Directive>) {
        self.entities.extend(directives);
    }

    /// Every node the description eventually starts, in order
    pub fn nodes(&self) -> Vec<&NodeAction> {
        collect_nodes(&self.entities)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `$(find-pkg-share gazebo_ros)/launch/gazebo.launch.py`
pub fn simulator_include() -> IncludeAction {
    IncludeAction::new(vec![Substitution::PathJoin(vec![
        vec![Substitution::find_package_share(SIMULATOR_PACKAGE)],
        vec![Substitution::text("launch")],
        vec![Substitution::text("gazebo.launch.py")],
    ])])
}

/// Launch arguments declared by the literal description
pub fn declared_arguments() -> Vec<DeclareArgumentAction> {
    [
        ("robot1_prefix", "robot1_"),
        ("robot2_prefix", "robot2_"),
        ("robot1_type", "ur10"),
        ("robot2_type", "ur5"),
        ("vacuum_gripper1_prefix", "vacuum_gripper1_"),
        ("vacuum_gripper2_prefix", "vacuum_gripper2_"),
        ("gripper1_plugin_name", "gripper1"),
        ("gripper2_plugin_name", "gripper2"),
    ]
    .into_iter()
    .map(|(name, default)| DeclareArgumentAction::new(name).with_default(default))
    .collect()
}

/// The two robots of the factory cell, spelled out literally
pub fn literal_robot_descriptors() -> [RobotGroupDescriptor; 2] {
    const TEMPLATE: &str = "robot_system/robot_system.xacro";

    let robot1 = RobotGroupDescriptor::new("robot1", "ur10", TEMPLATE, "vacuum_gripper1_", "gripper1")
        .with_pose(Pose::new(0.5, 1.8, 0.95))
        .with_joint("robot1_elbow_joint", 1.57)
        .with_joint("robot1_shoulder_lift_joint", -1.57)
        .with_joint("robot1_shoulder_pan_joint", 1.24)
        .with_joint("robot1_wrist_1_joint", -1.57)
        .with_joint("robot1_wrist_2_joint", -1.57);

    let robot2 = RobotGroupDescriptor::new("robot2", "ur5", TEMPLATE, "vacuum_gripper2_", "gripper2")
        .with_pose(Pose::new(-7.8, -1.5, 0.7).with_yaw(1.57))
        .with_joint("robot2_elbow_joint", 1.57)
        .with_joint("robot2_shoulder_lift_joint", -1.57)
        .with_joint("robot2_shoulder_pan_joint", 1.24)
        .with_joint("robot2_wrist_1_joint", -1.57)
        .with_joint("robot2_wrist_2_joint", -1.57);

    [robot1, robot2]
}

/// Simulator plus one flat group per literal robot
pub fn literal_launch_description() -> Result<LaunchDescription> {
    let assembler = RobotGroupAssembler::new(GroupLayout::Flat);

    let mut description = LaunchDescription::default();
    description.extend(declared_arguments().into_iter().map(Directive::DeclareArgument));
    description.push(Directive::Include(simulator_include()));
    for robot in literal_robot_descriptors() {
        description.push(Directive::Group(assembler.group(&robot)?));
    }

    log::info!(
        "Built literal launch description with {} entities",
        description.entities.len()
    );
    Ok(description)
}

/// Simulator plus one namespaced group per selected robot in `config`.
/// An empty selection takes every robot in file order.
pub fn configured_launch_description(
    config: &RobotsConfig,
    robots: &[String],
) -> Result<LaunchDescription> {
    let mut assembler = RobotGroupAssembler::new(GroupLayout::Namespaced);
    if let Some(package) = config.description_package() {
        assembler = assembler.with_description_package(package);
    }

    let mut description = LaunchDescription::default();
    description.push(Directive::Include(simulator_include()));
    for robot in config.descriptors(robots)? {
        description.push(Directive::Group(assembler.group(&robot)?));
    }

    log::info!(
        "Built configured launch description with {} entities",
        description.entities.len()
    );
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_description_layout() {
        let description = literal_launch_description().unwrap();
        let kinds: Vec<&str> = description.entities.iter().map(Directive::kind).collect();

        assert_eq!(kinds.iter().filter(|k| **k == "declare_argument").count(), 8);
        assert_eq!(kinds[8], "include");
        assert_eq!(&kinds[9..], &["group", "group"]);
    }

    #[test]
    fn test_literal_description_nodes() {
        let description = literal_launch_description().unwrap();
        let nodes = description.nodes();
        assert_eq!(nodes.len(), 4);
        assert_eq!(
            nodes[0].name,
            Some(vec![Substitution::text("robot1_state_publisher")])
        );
        assert_eq!(nodes[1].executable, vec![Substitution::text("spawn_entity.py")]);
    }

    #[test]
    fn test_simulator_include() {
        let include = simulator_include();
        assert_eq!(
            crate::substitution::render_substitutions(&include.file),
            "$(find-pkg-share gazebo_ros)/launch/gazebo.launch.py"
        );
    }

    #[test]
    fn test_to_json_tags_actions() {
        let description = literal_launch_description().unwrap();
        let json = description.to_json().unwrap();
        assert!(json.contains("\"action\": \"declare_argument\""));
        assert!(json.contains("\"action\": \"group\""));
    }
}
