// dbt/src/config/mod.rs
pub mod resolver;

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{AppError, Result};

pub use resolver::{ConnectionDescriptor, TargetResolver};

pub const DEFAULT_JOBS: u32 = 16;

/// One `default` or `db.<name>` section of conf.json. Every field is optional
/// here; the resolver decides which gaps are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialDescriptor {
    pub host: Option<String>,
    pub port: Option<PortValue>,
    pub user: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// A port as written in conf.json. Anything other than a number or a numeric
/// string is kept and rejected when the owning target is resolved, so one bad
/// entry does not make the rest of the file unusable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl PortValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, PortValue::Text(text) if text.trim().is_empty())
    }

    pub fn to_port(&self) -> Option<u16> {
        match self {
            PortValue::Number(n) => u16::try_from(*n).ok(),
            PortValue::Text(text) => text.trim().parse().ok(),
            PortValue::Other(_) => None,
        }
        .filter(|port| *port != 0)
    }
}

impl std::fmt::Display for PortValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortValue::Number(n) => write!(f, "{}", n),
            PortValue::Text(text) => write!(f, "{:?}", text),
            PortValue::Other(value) => write!(f, "{}", value),
        }
    }
}

// Shape of conf.json as written by operators.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawJsonConfig {
    jobs: Option<u32>,
    #[serde(default)]
    default: PartialDescriptor,
    #[serde(default)]
    db: HashMap<String, PartialDescriptor>,
}

/// Loaded once per invocation and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub jobs: u32,
    pub default: PartialDescriptor,
    pub db: HashMap<String, PartialDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            jobs: DEFAULT_JOBS,
            default: PartialDescriptor::default(),
            db: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Reads conf.json. A missing file is an empty configuration, not an error.
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "No config file at {}, using empty configuration",
                    config_path.display()
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json_str(&config_content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawJsonConfig = serde_json::from_str(content)?;

        let jobs = raw.jobs.unwrap_or(DEFAULT_JOBS);
        if jobs == 0 {
            return Err(AppError::Config("jobs must be at least 1".to_string()));
        }

        Ok(AppConfig {
            jobs,
            default: raw.default,
            db: raw.db,
        })
    }
}
