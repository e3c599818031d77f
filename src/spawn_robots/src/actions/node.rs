//! Node action implementation

use crate::{
    error::Result,
    substitution::{parse_substitutions, Substitution},
};
use serde::Serialize;
use std::fmt;

/// Where the host runtime sends a process's stdout/stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Screen,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Screen => "screen",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node action representing a ROS 2 node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAction {
    pub package: Vec<Substitution>,
    pub executable: Vec<Substitution>,
    pub name: Option<Vec<Substitution>>,
    pub namespace: Option<Vec<Substitution>>,
    pub output: Option<OutputMode>,
    pub parameters: Vec<Parameter>,
    pub param_files: Vec<Vec<Substitution>>,
    pub remappings: Vec<Remapping>,
    pub arguments: Vec<Vec<Substitution>>,
}

impl NodeAction {
    pub fn new(package: &str, executable: &str) -> Result<Self> {
        Ok(Self {
            package: parse_substitutions(package)?,
            executable: parse_substitutions(executable)?,
            name: None,
            namespace: None,
            output: None,
            parameters: Vec::new(),
            param_files: Vec::new(),
            remappings: Vec::new(),
            arguments: Vec::new(),
        })
    }

    pub fn with_name(mut self, name: &str) -> Result<Self> {
        self.name = Some(parse_substitutions(name)?);
        Ok(self)
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_parameter(mut self, name: &str, value: Vec<Substitution>) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn with_param_file(mut self, file: Vec<Substitution>) -> Self {
        self.param_files.push(file);
        self
    }

    pub fn with_remapping(mut self, from: &str, to: &str) -> Result<Self> {
        self.remappings.push(Remapping {
            from: parse_substitutions(from)?,
            to: parse_substitutions(to)?,
        });
        Ok(self)
    }

    pub fn with_argument(mut self, argument: Vec<Substitution>) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Append plain-text arguments
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for argument in arguments {
            self.arguments.push(parse_substitutions(argument.as_ref())?);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: Vec<Substitution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Remapping {
    pub from: Vec<Substitution>,
    pub to: Vec<Substitution>,
}
