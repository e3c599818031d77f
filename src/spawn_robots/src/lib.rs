//! spawn_robots library
//!
//! Builds the launch description that brings up a Gazebo world with a set
//! of robots: the simulator include, then per robot a templated model
//! description, a state publisher serving it and a spawner placing it.
//! The description can be handed to a ROS 2 launch runtime as XML, or
//! flattened into a resolved `record.json`.

pub mod actions;
pub mod error;
pub mod launch;
pub mod record;
pub mod robot;
pub mod substitution;
pub mod xml;

use error::Result;
use record::{CommandGenerator, RecordJson};
use std::collections::HashMap;
use std::path::Path;
use substitution::LaunchContext;

pub use launch::{configured_launch_description, literal_launch_description, LaunchDescription};
pub use robot::{GroupLayout, Pose, RobotGroupAssembler, RobotGroupDescriptor, RobotsConfig};

/// Load a robot configuration file and build its launch description
pub fn load_launch_description(path: &Path, robots: &[String]) -> Result<LaunchDescription> {
    let config = RobotsConfig::from_file(path)?;
    configured_launch_description(&config, robots)
}

/// Resolve a launch description into record.json.
///
/// `cli_args` seed the launch configurations; `package_prefixes` map package
/// names to install prefixes ahead of `AMENT_PREFIX_PATH`.
pub fn generate_record(
    description: &LaunchDescription,
    cli_args: HashMap<String, String>,
    package_prefixes: HashMap<String, std::path::PathBuf>,
) -> Result<RecordJson> {
    let mut context = LaunchContext::new();
    for (k, v) in cli_args {
        context.set_configuration(k, v);
    }
    for (package, prefix) in package_prefixes {
        context.register_package(package, prefix);
    }

    Ok(CommandGenerator::generate_record(description, &mut context)?)
}
