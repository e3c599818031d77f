//! Robot group descriptors, assembly and configuration

pub mod assembler;
pub mod config;
pub mod descriptor;

pub use assembler::{GroupLayout, RobotGroupAssembler};
pub use config::RobotsConfig;
pub use descriptor::{format_number, Pose, RobotGroupDescriptor};
