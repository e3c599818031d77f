use spawn_robots::{
    actions::{collect_nodes, Directive, NodeAction},
    configured_launch_description, generate_record, literal_launch_description,
    load_launch_description,
    robot::{GroupLayout, Pose, RobotGroupAssembler, RobotGroupDescriptor, RobotsConfig},
    substitution::render_substitutions,
    xml::to_launch_xml,
};
use std::{
    collections::{HashMap, HashSet},
    io::Write,
    path::PathBuf,
};
use tempfile::NamedTempFile;

const TWO_ROBOTS: &str = r#"
robots:
  robot1:
    type: ur10
    template_file: robot_system/robot_system.xacro
    gripper_prefix: vacuum_gripper1_
    gripper_plugin_name: gripper1
    pose: { x: 0.5, y: 1.8, z: 0.95 }
    joints:
      robot1_elbow_joint: 1.57
      robot1_shoulder_lift_joint: -1.57
      robot1_shoulder_pan_joint: 1.24
      robot1_wrist_1_joint: -1.57
      robot1_wrist_2_joint: -1.57
  robot2:
    type: ur5
    template_file: robot_system/robot_system.xacro
    parent_frame: world
    gripper_prefix: vacuum_gripper2_
    gripper_plugin_name: gripper2
    pose: { x: -7.8, y: -1.5, z: 0.7, yaw: 1.57 }
"#;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn prefixes() -> HashMap<String, PathBuf> {
    ["gazebo_ros", "hrwros_support", "robot_state_publisher"]
        .into_iter()
        .map(|p| (p.to_string(), PathBuf::from("/opt/ros/humble")))
        .collect()
}

fn spawner(directives: &[Directive]) -> &NodeAction {
    collect_nodes(directives)
        .into_iter()
        .find(|n| render_substitutions(&n.executable) == "spawn_entity.py")
        .expect("group has a spawner")
}

fn spawn_args(directives: &[Directive]) -> Vec<String> {
    spawner(directives)
        .arguments
        .iter()
        .map(|a| render_substitutions(a))
        .collect()
}

fn robot(name: &str, pose: Pose) -> RobotGroupDescriptor {
    RobotGroupDescriptor::new(
        name,
        "ur5",
        "robot_system/robot_system.xacro",
        format!("vacuum_{}_", name),
        format!("{}_gripper", name),
    )
    .with_pose(pose)
}

#[test]
fn test_unset_yaw_emits_no_yaw_flag() {
    let poses = [
        Pose::new(0.5, 1.8, 0.95),
        Pose::default(),
        Pose {
            x: Some(1.0),
            y: None,
            z: Some(0.2),
            yaw: None,
        },
    ];

    for layout in [GroupLayout::Flat, GroupLayout::Namespaced] {
        let assembler = RobotGroupAssembler::new(layout);
        for pose in poses {
            let directives = assembler.assemble(&robot("robot1", pose)).unwrap();
            let args = spawn_args(&directives);
            assert!(
                !args.iter().any(|a| a == "-Y"),
                "yaw flag emitted for {:?}: {:?}",
                pose,
                args
            );
        }
    }
}

#[test]
fn test_full_pose_emits_each_flag_once() {
    let pose = Pose::new(-7.8, -1.5, 0.7).with_yaw(1.57);
    let assembler = RobotGroupAssembler::new(GroupLayout::Flat);
    let args = spawn_args(&assembler.assemble(&robot("robot2", pose)).unwrap());

    for (flag, value) in [("-x", "-7.8"), ("-y", "-1.5"), ("-z", "0.7"), ("-Y", "1.57")] {
        let positions: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == flag)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 1, "flag {} in {:?}", flag, args);
        assert_eq!(args[positions[0] + 1], value);
        assert_eq!(args[positions[0] + 1].parse::<f64>().unwrap(), value.parse::<f64>().unwrap());
    }
}

#[test]
fn test_partial_pose_omits_unset_fields() {
    let pose = Pose {
        x: None,
        y: Some(2.0),
        z: None,
        yaw: Some(-0.5),
    };
    let assembler = RobotGroupAssembler::new(GroupLayout::Flat);
    let args = spawn_args(&assembler.assemble(&robot("robot1", pose)).unwrap());
    assert_eq!(
        args,
        vec!["-entity", "robot1", "-topic", "/robot1_description", "-y", "2.0", "-Y", "-0.5"]
    );
}

fn identifiers(directives: &[Directive]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for directive in directives {
        if let Directive::Let(let_action) = directive {
            ids.insert(let_action.name.clone());
        }
    }
    for node in collect_nodes(directives) {
        if let Some(name) = &node.name {
            ids.insert(render_substitutions(name));
        }
        for param in &node.parameters {
            ids.insert(render_substitutions(&param.value));
        }
        for remap in &node.remappings {
            ids.insert(render_substitutions(&remap.to));
        }
        let args: Vec<String> = node.arguments.iter().map(|a| render_substitutions(a)).collect();
        for pair in args.windows(2) {
            if pair[0] == "-entity" || pair[0] == "-topic" {
                ids.insert(pair[1].clone());
            }
        }
    }
    ids
}

#[test]
fn test_two_robots_use_disjoint_identifiers() {
    for layout in [GroupLayout::Flat, GroupLayout::Namespaced] {
        let assembler = RobotGroupAssembler::new(layout);
        let robot1 = assembler
            .assemble(&robot("robot1", Pose::new(0.0, 0.0, 0.0)).with_controllers(true))
            .unwrap();
        let robot2 = assembler
            .assemble(&robot("robot2", Pose::new(0.0, 0.0, 0.0)).with_controllers(true))
            .unwrap();

        let ids1 = identifiers(&robot1);
        let ids2 = identifiers(&robot2);
        assert!(ids1.len() >= 6, "too few identifiers: {:?}", ids1);
        assert!(
            ids1.is_disjoint(&ids2),
            "shared identifiers: {:?}",
            ids1.intersection(&ids2).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_config_matches_literal_construction() {
    let config = RobotsConfig::from_yaml_str(TWO_ROBOTS).unwrap();

    let literal1 = RobotGroupDescriptor::new(
        "robot1",
        "ur10",
        "robot_system/robot_system.xacro",
        "vacuum_gripper1_",
        "gripper1",
    )
    .with_pose(Pose::new(0.5, 1.8, 0.95))
    .with_joint("robot1_elbow_joint", 1.57)
    .with_joint("robot1_shoulder_lift_joint", -1.57)
    .with_joint("robot1_shoulder_pan_joint", 1.24)
    .with_joint("robot1_wrist_1_joint", -1.57)
    .with_joint("robot1_wrist_2_joint", -1.57);

    let literal2 = RobotGroupDescriptor::new(
        "robot2",
        "ur5",
        "robot_system/robot_system.xacro",
        "vacuum_gripper2_",
        "gripper2",
    )
    .with_parent_frame("world")
    .with_pose(Pose::new(-7.8, -1.5, 0.7).with_yaw(1.57));

    for layout in [GroupLayout::Flat, GroupLayout::Namespaced] {
        let assembler = RobotGroupAssembler::new(layout);
        for literal in [&literal1, &literal2] {
            let loaded = config.descriptor(&literal.name).unwrap();
            assert_eq!(&loaded, literal);
            assert_eq!(
                assembler.assemble(&loaded).unwrap(),
                assembler.assemble(literal).unwrap()
            );
        }
    }
}

#[test]
fn test_literal_and_configured_descriptions_share_groups() {
    // Same robots, different layouts: the nodes match, only the namespace
    // push and the template's parent frame differ.
    let config = RobotsConfig::from_yaml_str(TWO_ROBOTS).unwrap();
    let configured = configured_launch_description(&config, &[]).unwrap();
    let literal = literal_launch_description().unwrap();

    let literal_nodes = literal.nodes();
    let configured_nodes = configured.nodes();
    assert_eq!(literal_nodes.len(), configured_nodes.len());
    for (a, b) in literal_nodes.iter().zip(configured_nodes.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.arguments, b.arguments);
        assert_eq!(a.remappings, b.remappings);
    }
}

#[test]
fn test_configured_description_pushes_namespaces() {
    let file = write_config(TWO_ROBOTS);
    let description = load_launch_description(file.path(), &[]).unwrap();

    assert_eq!(description.entities.len(), 3);
    assert!(matches!(description.entities[0], Directive::Include(_)));

    for (entity, name) in description.entities[1..].iter().zip(["robot1", "robot2"]) {
        let Directive::Group(group) = entity else {
            panic!("expected group, got {:?}", entity);
        };
        let Directive::PushRosNamespace(push) = &group.actions[0] else {
            panic!("expected namespace push first");
        };
        assert_eq!(render_substitutions(&push.namespace), name);
    }
}

#[test]
fn test_configured_record_is_namespaced() {
    let file = write_config(TWO_ROBOTS);
    let description = load_launch_description(file.path(), &[]).unwrap();
    let record = generate_record(&description, HashMap::new(), prefixes()).unwrap();

    let namespaces: Vec<&str> = record.node.iter().map(|n| n.namespace.as_str()).collect();
    assert_eq!(namespaces, vec!["/robot1", "/robot1", "/robot2", "/robot2"]);

    let rsp = &record.node[2];
    assert_eq!(rsp.name, "robot2_state_publisher");
    let description_param = &rsp.params[0];
    assert_eq!(description_param.0, "robot_description");
    assert_eq!(
        description_param.1,
        "$(command 'xacro /opt/ros/humble/share/hrwros_support/urdf/robot_system/robot_system.xacro \
         robot_type:=ur5 robot_prefix:=robot2 vacuum_gripper_prefix:=vacuum_gripper2_ \
         parent_frame:=world gripper_plugin_name:=gripper2')"
    );
    assert_eq!(
        rsp.cmd[0],
        "/opt/ros/humble/lib/robot_state_publisher/robot_state_publisher"
    );
    assert!(rsp.cmd.contains(&"__ns:=/robot2".to_string()));
    assert!(rsp.cmd.contains(&"/robot_description:=/robot2_description".to_string()));
}

#[test]
fn test_literal_record_command_lines() {
    let description = literal_launch_description().unwrap();
    let record = generate_record(&description, HashMap::new(), prefixes()).unwrap();

    let spawner = &record.node[3];
    assert_eq!(spawner.package, "gazebo_ros");
    assert_eq!(spawner.output.as_deref(), Some("screen"));
    assert_eq!(
        spawner.args.as_deref(),
        Some(
            &[
                "-entity",
                "robot2",
                "-topic",
                "/robot2_description",
                "-x",
                "-7.8",
                "-y",
                "-1.5",
                "-z",
                "0.7",
                "-Y",
                "1.57"
            ]
            .map(String::from)[..]
        )
    );
    assert_eq!(spawner.namespace, "/");
}

#[test]
fn test_selected_robot_only() {
    let file = write_config(TWO_ROBOTS);
    let description = load_launch_description(file.path(), &["robot2".to_string()]).unwrap();
    assert_eq!(description.entities.len(), 2);
    assert_eq!(description.nodes().len(), 2);
}

#[test]
fn test_xml_output_is_well_formed() {
    let description = literal_launch_description().unwrap();
    let xml = to_launch_xml(&description);
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let nodes: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name("node"))
        .collect();
    assert_eq!(nodes.len(), 4);
    assert_eq!(
        nodes[1].attribute("args"),
        Some("-entity robot1 -topic /robot1_description -x 0.5 -y 1.8 -z 0.95")
    );

    let lets: Vec<_> = doc.descendants().filter(|n| n.has_tag_name("let")).collect();
    assert_eq!(lets[0].attribute("name"), Some("robot1_description"));
    assert!(lets[0]
        .attribute("value")
        .unwrap()
        .starts_with("$(command 'xacro $(find-pkg-share hrwros_support)/urdf/"));
}

#[test]
fn test_shipped_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/robots.yaml");
    let config = RobotsConfig::from_file(&path).unwrap();

    assert_eq!(config.robot_names().to_vec(), vec!["robot1", "robot2"]);
    assert_eq!(config.description_package(), Some("hrwros_support"));

    let robot2 = config.descriptor("robot2").unwrap();
    assert_eq!(robot2.pose, Pose::new(-7.8, -1.5, 0.7).with_yaw(1.57));
    assert_eq!(robot2.joints.len(), 5);

    let description = configured_launch_description(&config, &[]).unwrap();
    assert_eq!(description.nodes().len(), 4);
}
