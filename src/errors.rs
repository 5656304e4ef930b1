use std::fmt;

use thiserror::Error;

/// Connection fields that have no usable fallback and must come from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Password,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Name => f.write_str("name"),
            RequiredField::Password => f.write_str("password"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("db.{name} is not defined in config")]
    UnknownTarget { name: String },

    #[error("db.{target}.{field} is not defined in config")]
    MissingField { target: String, field: RequiredField },

    #[error("db.{target}.port is not a valid port: {value}")]
    InvalidPort { target: String, value: String },

    #[error("'{name}' cannot be used as a dump directory name")]
    InvalidTargetName { name: String },

    #[error("{program} exited with {}", exit_description(.code))]
    ProcessFailure { program: String, code: Option<i32> },

    #[error("{program} executable not found in PATH. Please ensure PostgreSQL client tools are installed and in your PATH.")]
    ToolNotFound { program: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
