//! Launch context for managing configurations

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Launch context holding configurations and state
#[derive(Debug, Clone)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
    namespace_stack: Vec<String>,
    package_prefixes: HashMap<String, PathBuf>,
}

impl LaunchContext {
    pub fn new() -> Self {
        Self {
            configurations: HashMap::new(),
            namespace_stack: vec!["/".to_string()], // Start with root namespace
            package_prefixes: HashMap::new(),
        }
    }

    pub fn set_configuration(&mut self, name: String, value: String) {
        self.configurations.insert(name, value);
    }

    pub fn get_configuration(&self, name: &str) -> Option<String> {
        self.configurations.get(name).cloned()
    }

    /// Register an install prefix for a package, taking precedence over
    /// `AMENT_PREFIX_PATH`.
    pub fn register_package(&mut self, package: impl Into<String>, prefix: impl Into<PathBuf>) {
        self.package_prefixes.insert(package.into(), prefix.into());
    }

    /// Install prefix of a package (the directory holding `share/` and `lib/`)
    pub fn find_package_prefix(&self, package: &str) -> Option<PathBuf> {
        if let Some(prefix) = self.package_prefixes.get(package) {
            return Some(prefix.clone());
        }

        let prefix_path = std::env::var("AMENT_PREFIX_PATH").ok()?;
        prefix_path
            .split(':')
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .find(|prefix| prefix.join("share").join(package).exists())
    }

    pub fn find_package_share(&self, package: &str) -> Option<PathBuf> {
        self.find_package_prefix(package)
            .map(|prefix| prefix.join("share").join(package))
    }

    pub fn find_executable(&self, package: &str, executable: &str) -> Option<PathBuf> {
        self.find_package_prefix(package)
            .map(|prefix| lib_path(&prefix, package, executable))
    }

    /// Push a namespace onto the stack
    pub fn push_namespace(&mut self, namespace: String) {
        let trimmed = namespace.trim();

        if trimmed.is_empty() || trimmed == "/" {
            // Empty or root namespace - don't change the stack
            return;
        }

        let is_absolute = trimmed.starts_with('/');
        let normalized = normalize_namespace(trimmed);

        if normalized.is_empty() || normalized == "/" {
            return;
        }

        let new_ns = if is_absolute {
            normalized
        } else {
            let current = self.current_namespace();
            if current == "/" {
                format!("/{}", normalized)
            } else {
                format!("{}/{}", current, normalized)
            }
        };

        self.namespace_stack.push(new_ns);
    }

    pub fn current_namespace(&self) -> String {
        self.namespace_stack
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }
}

fn lib_path(prefix: &Path, package: &str, executable: &str) -> PathBuf {
    prefix.join("lib").join(package).join(executable)
}

/// Normalize a namespace string
fn normalize_namespace(ns: &str) -> String {
    let trimmed = ns.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    trimmed.trim_end_matches('/').to_string()
}

impl Default for LaunchContext {
    fn default() -> Self {
        Self::new()
    }
}
