//! Error types for spawn_robots

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid substitution syntax: {0}")]
    InvalidSubstitution(String),

    #[error("Substitution error: {0}")]
    Substitution(#[from] SubstitutionError),

    #[error("Record generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Lookup failures while resolving a robot group from configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Configuration has no 'robots' mapping")]
    MissingRobots,

    #[error("Configuration 'robots' mapping is empty")]
    NoRobots,

    #[error("Robot key {key} is invalid (expected a string robot name)")]
    InvalidRobotKey { key: String },

    #[error("Robot '{robot}' is selected more than once")]
    DuplicateRobot { robot: String },

    #[error("Configuration key '{key}' is invalid (expected {expected})")]
    InvalidSetting { key: String, expected: &'static str },

    #[error("Robot '{robot}' not found in configuration (known robots: {known})")]
    RobotNotFound { robot: String, known: String },

    #[error("Robot '{robot}' is missing required field '{field}'")]
    MissingField { robot: String, field: String },

    #[error("Robot '{robot}' has an empty value for field '{field}'")]
    EmptyField { robot: String, field: String },

    #[error("Robot '{robot}' field '{field}' is invalid (expected {expected})")]
    InvalidField {
        robot: String,
        field: String,
        expected: &'static str,
    },

    #[error("Robot '{robot}' field '{field}' has invalid substitution syntax: {message}")]
    InvalidSubstitution {
        robot: String,
        field: String,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum SubstitutionError {
    #[error("Undefined variable: '{0}'. Did you forget to declare it as a launch argument?")]
    UndefinedVariable(String),

    #[error(
        "Undefined environment variable: '{0}'. Make sure the variable is set in your environment."
    )]
    UndefinedEnvVar(String),

    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Substitution error: {0}")]
    Substitution(#[from] SubstitutionError),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid timer period {0} (must be finite and non-negative)")]
    InvalidPeriod(f64),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
