// dbt/src/utils/command.rs
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use which::which;

use crate::errors::{AppError, Result};

/// One external process to run: program, argument vector and the variables
/// layered over the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(program: &str) -> Self {
        Invocation {
            program: program.to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

/// Renders the command line as logged before execution. Environment values
/// are not rendered.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The single boundary through which external tools are started.
pub trait CommandRunner {
    fn execute(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes and blocks until they exit. The child inherits
/// stdin, stdout and stderr so interactive tools behave normally.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn find_executable(program: &str) -> Result<PathBuf> {
        which(program).map_err(|_| AppError::ToolNotFound {
            program: program.to_string(),
        })
    }
}

impl CommandRunner for SystemRunner {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        tracing::info!("$ {}", invocation);
        if !invocation.env.is_empty() {
            tracing::debug!(
                "Environment overlay: {:?}",
                invocation.env.keys().collect::<Vec<_>>()
            );
        }

        let executable = Self::find_executable(&invocation.program)?;
        let status = Command::new(executable)
            .args(&invocation.args)
            .envs(&invocation.env)
            .status()?;

        if !status.success() {
            return Err(AppError::ProcessFailure {
                program: invocation.program.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
