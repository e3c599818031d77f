//! Substitution types

use crate::error::SubstitutionError;
use crate::substitution::context::LaunchContext;
use serde::Serialize;
use std::path::PathBuf;

/// Substitution enum representing different types of substitutions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Substitution {
    /// Plain text (no substitution)
    Text(String),
    /// $(var name) - Launch configuration variable
    LaunchConfiguration(Vec<Substitution>),
    /// $(env VAR [default]) - Environment variable with optional default
    EnvironmentVariable {
        name: Vec<Substitution>,
        default: Option<Vec<Substitution>>,
    },
    /// $(find-pkg-share package_name) - Find ROS 2 package share directory
    FindPackageShare(Vec<Substitution>),
    /// Path components joined with the platform separator
    PathJoin(Vec<Vec<Substitution>>),
    /// $(command 'cmd') - Command whose stdout becomes the value.
    ///
    /// Never executed here; resolution only expands the inner command line.
    Command(Vec<Substitution>),
}

impl Substitution {
    pub fn text(s: impl Into<String>) -> Self {
        Substitution::Text(s.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Substitution::LaunchConfiguration(vec![Substitution::text(name)])
    }

    pub fn find_package_share(package: impl Into<String>) -> Self {
        Substitution::FindPackageShare(vec![Substitution::text(package)])
    }

    /// Resolve substitution to string value
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        match self {
            Substitution::Text(s) => Ok(s.clone()),
            Substitution::LaunchConfiguration(name) => {
                let name = resolve_substitutions(name, context)?;
                context
                    .get_configuration(&name)
                    .ok_or(SubstitutionError::UndefinedVariable(name))
            }
            Substitution::EnvironmentVariable { name, default } => {
                let name = resolve_substitutions(name, context)?;
                match std::env::var(&name) {
                    Ok(value) => Ok(value),
                    Err(_) => match default {
                        Some(default) => resolve_substitutions(default, context),
                        None => Err(SubstitutionError::UndefinedEnvVar(name)),
                    },
                }
            }
            Substitution::FindPackageShare(package) => {
                let package = resolve_substitutions(package, context)?;
                context
                    .find_package_share(&package)
                    .map(|p| p.to_string_lossy().into_owned())
                    .ok_or(SubstitutionError::PackageNotFound(package))
            }
            Substitution::PathJoin(parts) => {
                let mut path = PathBuf::new();
                for part in parts {
                    path.push(resolve_substitutions(part, context)?);
                }
                Ok(path.to_string_lossy().into_owned())
            }
            Substitution::Command(cmd) => {
                let line = resolve_substitutions(cmd, context)?;
                Ok(format!("$(command '{}')", line))
            }
        }
    }

    /// Render back to launch-file syntax, leaving every substitution unresolved.
    pub fn render(&self) -> String {
        match self {
            Substitution::Text(s) => s.clone(),
            Substitution::LaunchConfiguration(name) => {
                format!("$(var {})", render_substitutions(name))
            }
            Substitution::EnvironmentVariable { name, default } => match default {
                Some(default) => format!(
                    "$(env {} {})",
                    render_substitutions(name),
                    render_substitutions(default)
                ),
                None => format!("$(env {})", render_substitutions(name)),
            },
            Substitution::FindPackageShare(package) => {
                format!("$(find-pkg-share {})", render_substitutions(package))
            }
            Substitution::PathJoin(parts) => parts
                .iter()
                .map(|p| render_substitutions(p))
                .collect::<Vec<_>>()
                .join("/"),
            Substitution::Command(cmd) => format!("$(command '{}')", render_substitutions(cmd)),
        }
    }
}

/// Resolve list of substitutions to single string
pub fn resolve_substitutions(
    subs: &[Substitution],
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let mut result = String::new();
    for sub in subs {
        result.push_str(&sub.resolve(context)?);
    }
    Ok(result)
}

/// Render list of substitutions in launch-file syntax
pub fn render_substitutions(subs: &[Substitution]) -> String {
    subs.iter().map(Substitution::render).collect()
}
