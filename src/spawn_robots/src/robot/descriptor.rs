//! Per-robot descriptor

use crate::{
    error::{ConfigError, LaunchError},
    substitution::{parse_substitutions, Substitution},
};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

/// Spawn pose. Unset fields are left to the spawner's own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pose {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub yaw: Option<f64>,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            yaw: None,
        }
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = Some(yaw);
        self
    }

    /// `(flag, value)` pairs for the set fields, in spawner flag order
    pub fn spawn_flags(&self) -> Vec<(&'static str, f64)> {
        [("-x", self.x), ("-y", self.y), ("-z", self.z), ("-Y", self.yaw)]
            .into_iter()
            .filter_map(|(flag, value)| value.map(|v| (flag, v)))
            .collect()
    }

    fn fields(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("pose.x", self.x),
            ("pose.y", self.y),
            ("pose.z", self.z),
            ("pose.yaw", self.yaw),
        ]
    }
}

/// Identity, template and placement of one robot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotGroupDescriptor {
    pub name: String,
    pub robot_type: String,
    /// Template path relative to the description package's `urdf/` directory
    pub template_file: String,
    pub parent_frame: Option<String>,
    pub gripper_prefix: String,
    pub gripper_plugin_name: String,
    pub pose: Pose,
    /// Initial joint angles. Carried along but not emitted.
    pub joints: BTreeMap<String, f64>,
    pub joint_state_publisher: bool,
    pub controllers: bool,
}

impl RobotGroupDescriptor {
    pub fn new(
        name: impl Into<String>,
        robot_type: impl Into<String>,
        template_file: impl Into<String>,
        gripper_prefix: impl Into<String>,
        gripper_plugin_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            robot_type: robot_type.into(),
            template_file: template_file.into(),
            parent_frame: None,
            gripper_prefix: gripper_prefix.into(),
            gripper_plugin_name: gripper_plugin_name.into(),
            pose: Pose::default(),
            joints: BTreeMap::new(),
            joint_state_publisher: false,
            controllers: false,
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_parent_frame(mut self, parent_frame: impl Into<String>) -> Self {
        self.parent_frame = Some(parent_frame.into());
        self
    }

    pub fn with_joint(mut self, joint: impl Into<String>, angle: f64) -> Self {
        self.joints.insert(joint.into(), angle);
        self
    }

    pub fn with_joint_state_publisher(mut self, enabled: bool) -> Self {
        self.joint_state_publisher = enabled;
        self
    }

    pub fn with_controllers(mut self, enabled: bool) -> Self {
        self.controllers = enabled;
        self
    }

    /// Launch configuration holding the expanded model description
    pub fn description_name(&self) -> String {
        format!("{}_description", self.name)
    }

    /// Topic the state publisher serves the description on
    pub fn description_topic(&self) -> String {
        format!("/{}_description", self.name)
    }

    /// Parse one of this robot's fields, attributing syntax errors to it
    pub fn parse_field(&self, field: &str, value: &str) -> Result<Vec<Substitution>, ConfigError> {
        parse_substitutions(value).map_err(|err| ConfigError::InvalidSubstitution {
            robot: self.name.clone(),
            field: field.to_string(),
            message: match err {
                LaunchError::InvalidSubstitution(message) => message,
                other => other.to_string(),
            },
        })
    }

    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("name", self.name.as_str()),
            ("type", self.robot_type.as_str()),
            ("template_file", self.template_file.as_str()),
            ("gripper_prefix", self.gripper_prefix.as_str()),
            ("gripper_plugin_name", self.gripper_plugin_name.as_str()),
        ];
        if let Some(parent) = &self.parent_frame {
            fields.push(("parent_frame", parent.as_str()));
        }
        fields
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.text_fields() {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    robot: self.name.clone(),
                    field: field.to_string(),
                });
            }
            self.parse_field(field, value)?;
        }

        // Joined under `<share>/urdf`; an absolute path would escape it
        if self.template_file.starts_with('/') || Path::new(&self.template_file).is_absolute() {
            return Err(ConfigError::InvalidField {
                robot: self.name.clone(),
                field: "template_file".to_string(),
                expected: "a path relative to the package's urdf directory",
            });
        }

        for (field, value) in self.pose.fields() {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidField {
                    robot: self.name.clone(),
                    field: field.to_string(),
                    expected: "a finite number",
                });
            }
        }

        Ok(())
    }
}

/// Stringify a float the way the launch runtime prints them: shortest
/// round-trip form, a fractional part in positional notation, and a signed
/// two-digit exponent (`1e+16`, `1e-05`) outside `[1e-4, 1e16)`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    let debug = format!("{:?}", value);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => debug,
    }
}
