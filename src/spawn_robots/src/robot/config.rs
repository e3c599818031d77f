//! Robot configuration file loading
//!
//! ```yaml
//! description_package: hrwros_support
//! robots:
//!   robot1:
//!     type: ur10
//!     template_file: robot_system/robot_system.xacro
//!     parent_frame: world
//!     gripper_prefix: vacuum_gripper1_
//!     gripper_plugin_name: gripper1
//!     pose: { x: 0.5, y: 1.8, z: 0.95 }
//!     joints: { robot1_elbow_joint: 1.57 }
//! ```
//!
//! Lookups are field by field so a bad entry reports the robot and field
//! at fault instead of falling back to a default.

use super::descriptor::{Pose, RobotGroupDescriptor};
use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::{collections::HashSet, fs, path::Path};

const KNOWN_FIELDS: &[&str] = &[
    "type",
    "template_file",
    "parent_frame",
    "gripper_prefix",
    "gripper_plugin_name",
    "pose",
    "joints",
    "joint_state_publisher",
    "controllers",
];

const POSE_FIELDS: &[&str] = &["x", "y", "z", "yaw"];

/// Loaded robot configuration
#[derive(Debug, Clone)]
pub struct RobotsConfig {
    description_package: Option<String>,
    /// Robot names in file order
    names: Vec<String>,
    robots: Mapping,
}

impl RobotsConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        log::info!("Loading robot configuration: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content)?;

        let robots = root
            .get("robots")
            .and_then(Value::as_mapping)
            .cloned()
            .ok_or(ConfigError::MissingRobots)?;
        if robots.is_empty() {
            return Err(ConfigError::NoRobots.into());
        }

        let names = robots
            .keys()
            .map(|key| {
                key.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ConfigError::InvalidRobotKey {
                        key: describe_key(key),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let description_package = match root.get("description_package") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(_) => {
                return Err(ConfigError::InvalidSetting {
                    key: "description_package".to_string(),
                    expected: "a non-empty string",
                }
                .into())
            }
        };

        Ok(Self {
            description_package,
            names,
            robots,
        })
    }

    pub fn description_package(&self) -> Option<&str> {
        self.description_package.as_deref()
    }

    /// Robot names in file order
    pub fn robot_names(&self) -> &[String] {
        &self.names
    }

    /// Look up one robot and build its descriptor
    pub fn descriptor(&self, robot: &str) -> std::result::Result<RobotGroupDescriptor, ConfigError> {
        let entry = self
            .robots
            .get(robot)
            .ok_or_else(|| ConfigError::RobotNotFound {
                robot: robot.to_string(),
                known: self.names.join(", "),
            })?;

        let fields = entry.as_mapping().ok_or_else(|| ConfigError::InvalidField {
            robot: robot.to_string(),
            field: "robots".to_string(),
            expected: "a mapping of robot fields",
        })?;

        for key in fields.keys() {
            match key.as_str() {
                Some(name) if KNOWN_FIELDS.contains(&name) => {}
                _ => log::warn!("Robot '{}': ignoring unknown field {:?}", robot, key),
            }
        }

        let reader = FieldReader { robot, fields };

        let mut descriptor = RobotGroupDescriptor::new(
            robot,
            reader.required_str("type")?,
            reader.required_str("template_file")?,
            reader.required_str("gripper_prefix")?,
            reader.required_str("gripper_plugin_name")?,
        )
        .with_pose(reader.pose()?)
        .with_joint_state_publisher(reader.optional_bool("joint_state_publisher")?.unwrap_or(false))
        .with_controllers(reader.optional_bool("controllers")?.unwrap_or(false));

        if let Some(parent) = reader.optional_str("parent_frame")? {
            descriptor = descriptor.with_parent_frame(parent);
        }

        for (joint, angle) in reader.joints()? {
            descriptor = descriptor.with_joint(joint, angle);
        }

        descriptor.validate()?;
        log::debug!("Loaded robot '{}' from configuration", robot);
        Ok(descriptor)
    }

    /// Descriptors for the given robots, or for every robot when `names` is empty.
    /// A robot selected twice would collide with itself, so duplicates fail.
    pub fn descriptors(
        &self,
        names: &[String],
    ) -> std::result::Result<Vec<RobotGroupDescriptor>, ConfigError> {
        let names = if names.is_empty() { self.names.as_slice() } else { names };

        let mut seen = HashSet::new();
        names
            .iter()
            .map(|name| {
                if !seen.insert(name.as_str()) {
                    return Err(ConfigError::DuplicateRobot {
                        robot: name.clone(),
                    });
                }
                self.descriptor(name)
            })
            .collect()
    }
}

/// Render a mapping key the way it was written in the file
fn describe_key(key: &Value) -> String {
    serde_yaml::to_string(key)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", key))
}

struct FieldReader<'a> {
    robot: &'a str,
    fields: &'a Mapping,
}

impl FieldReader<'_> {
    fn get(&self, field: &str) -> Option<&Value> {
        match self.fields.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&self, field: &str) -> ConfigError {
        ConfigError::MissingField {
            robot: self.robot.to_string(),
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidField {
            robot: self.robot.to_string(),
            field: field.to_string(),
            expected,
        }
    }

    fn required_str(&self, field: &str) -> std::result::Result<String, ConfigError> {
        self.optional_str(field)?
            .ok_or_else(|| self.missing(field))
    }

    fn optional_str(&self, field: &str) -> std::result::Result<Option<String>, ConfigError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let s = value.as_str().ok_or_else(|| self.invalid(field, "a string"))?;
        if s.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                robot: self.robot.to_string(),
                field: field.to_string(),
            });
        }
        Ok(Some(s.to_string()))
    }

    fn optional_bool(&self, field: &str) -> std::result::Result<Option<bool>, ConfigError> {
        self.get(field)
            .map(|v| v.as_bool().ok_or_else(|| self.invalid(field, "a boolean")))
            .transpose()
    }

    fn pose(&self) -> std::result::Result<Pose, ConfigError> {
        let Some(value) = self.get("pose") else {
            return Ok(Pose::default());
        };
        let pose = value
            .as_mapping()
            .ok_or_else(|| self.invalid("pose", "a mapping with x, y, z, yaw"))?;

        for key in pose.keys() {
            if !key.as_str().is_some_and(|k| POSE_FIELDS.contains(&k)) {
                return Err(self.invalid("pose", "only the keys x, y, z, yaw"));
            }
        }

        let read = |axis: &str| -> std::result::Result<Option<f64>, ConfigError> {
            match pose.get(axis) {
                None | Some(Value::Null) => Ok(None),
                Some(v) => v
                    .as_f64()
                    .map(Some)
                    .ok_or_else(|| self.invalid(&format!("pose.{}", axis), "a number")),
            }
        };

        Ok(Pose {
            x: read("x")?,
            y: read("y")?,
            z: read("z")?,
            yaw: read("yaw")?,
        })
    }

    fn joints(&self) -> std::result::Result<Vec<(String, f64)>, ConfigError> {
        let Some(value) = self.get("joints") else {
            return Ok(Vec::new());
        };
        let joints = value
            .as_mapping()
            .ok_or_else(|| self.invalid("joints", "a mapping of joint name to angle"))?;

        joints
            .iter()
            .map(|(name, angle)| {
                let name = name
                    .as_str()
                    .ok_or_else(|| self.invalid("joints", "string joint names"))?;
                let angle = angle
                    .as_f64()
                    .ok_or_else(|| self.invalid(&format!("joints.{}", name), "a number"))?;
                Ok((name.to_string(), angle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;

    const CONFIG: &str = r#"
robots:
  robot1:
    type: ur10
    template_file: robot_system/robot_system.xacro
    parent_frame: world
    gripper_prefix: vacuum_gripper1_
    gripper_plugin_name: gripper1
    pose: { x: 0.5, y: 1.8, z: 0.95 }
    joints:
      robot1_elbow_joint: 1.57
      robot1_shoulder_lift_joint: -1.57
  robot2:
    type: ur5
    template_file: robot_system/robot_system.xacro
    gripper_prefix: vacuum_gripper2_
    gripper_plugin_name: gripper2
    pose: { x: -7.8, y: -1.5, z: 0.7, yaw: 1.57 }
"#;

    #[test]
    fn test_robot_names_in_file_order() {
        let config = RobotsConfig::from_yaml_str(CONFIG).unwrap();
        assert_eq!(config.robot_names().to_vec(), vec!["robot1", "robot2"]);
        assert!(config.description_package().is_none());
    }

    #[test]
    fn test_descriptor_fields() {
        let config = RobotsConfig::from_yaml_str(CONFIG).unwrap();
        let robot1 = config.descriptor("robot1").unwrap();

        assert_eq!(robot1.name, "robot1");
        assert_eq!(robot1.robot_type, "ur10");
        assert_eq!(robot1.parent_frame.as_deref(), Some("world"));
        assert_eq!(robot1.pose, Pose::new(0.5, 1.8, 0.95));
        assert_eq!(robot1.joints.len(), 2);
        assert_eq!(robot1.joints["robot1_shoulder_lift_joint"], -1.57);
        assert!(!robot1.controllers);
    }

    #[test]
    fn test_integer_pose_values() {
        let config = RobotsConfig::from_yaml_str(
            "robots:\n  r:\n    type: ur5\n    template_file: a.xacro\n    gripper_prefix: g_\n    gripper_plugin_name: g\n    pose: { x: 1, z: 0 }\n",
        )
        .unwrap();
        let robot = config.descriptor("r").unwrap();
        assert_eq!(robot.pose.x, Some(1.0));
        assert_eq!(robot.pose.y, None);
        assert_eq!(robot.pose.z, Some(0.0));
    }

    #[test]
    fn test_unknown_robot() {
        let config = RobotsConfig::from_yaml_str(CONFIG).unwrap();
        let err = config.descriptor("robot3").unwrap_err();
        assert_eq!(
            err,
            ConfigError::RobotNotFound {
                robot: "robot3".to_string(),
                known: "robot1, robot2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_field() {
        let config = RobotsConfig::from_yaml_str(
            "robots:\n  robot1:\n    type: ur10\n    template_file: a.xacro\n    gripper_prefix: g_\n",
        )
        .unwrap();
        let err = config.descriptor("robot1").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField {
                robot: "robot1".to_string(),
                field: "gripper_plugin_name".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Robot 'robot1' is missing required field 'gripper_plugin_name'"
        );
    }

    #[test]
    fn test_non_numeric_pose() {
        let config = RobotsConfig::from_yaml_str(
            "robots:\n  robot1:\n    type: ur10\n    template_file: a.xacro\n    gripper_prefix: g_\n    gripper_plugin_name: g\n    pose: { x: far }\n",
        )
        .unwrap();
        let err = config.descriptor("robot1").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidField {
                robot: "robot1".to_string(),
                field: "pose.x".to_string(),
                expected: "a number",
            }
        );
    }

    #[test]
    fn test_misspelled_pose_key() {
        let config = RobotsConfig::from_yaml_str(
            "robots:\n  robot1:\n    type: ur10\n    template_file: a.xacro\n    gripper_prefix: g_\n    gripper_plugin_name: g\n    pose: { x: 1.0, yaw_: 0.3 }\n",
        )
        .unwrap();
        assert!(matches!(
            config.descriptor("robot1"),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_wrong_type_string_field() {
        let config = RobotsConfig::from_yaml_str(
            "robots:\n  robot1:\n    type: 10\n    template_file: a.xacro\n    gripper_prefix: g_\n    gripper_plugin_name: g\n",
        )
        .unwrap();
        let err = config.descriptor("robot1").unwrap_err();
        assert!(err.to_string().contains("'type'"));
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_missing_robots_mapping() {
        let err = RobotsConfig::from_yaml_str("description_package: foo\n").unwrap_err();
        assert!(matches!(err, LaunchError::Config(ConfigError::MissingRobots)));
    }

    #[test]
    fn test_descriptors_selection() {
        let config = RobotsConfig::from_yaml_str(CONFIG).unwrap();
        let all = config.descriptors(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let only = config.descriptors(&["robot2".to_string()]).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "robot2");
    }
}
