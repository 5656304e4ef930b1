// dbt/src/config/resolver.rs
use std::collections::HashMap;

use crate::config::{AppConfig, PartialDescriptor, PortValue};
use crate::errors::{AppError, RequiredField, Result};

pub const FALLBACK_HOST: &str = "localhost";
pub const FALLBACK_PORT: u16 = 5432;
pub const FALLBACK_USER: &str = "postgres";

/// Everything the PostgreSQL client tools need to address one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub name: String,
    pub password: String,
}

/// Resolves target names against a borrowed configuration, remembering each
/// merged descriptor so repeated lookups within a run agree.
#[derive(Debug)]
pub struct TargetResolver<'a> {
    config: &'a AppConfig,
    resolved: HashMap<String, ConnectionDescriptor>,
}

impl<'a> TargetResolver<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        TargetResolver {
            config,
            resolved: HashMap::new(),
        }
    }

    pub fn jobs(&self) -> u32 {
        self.config.jobs
    }

    pub fn resolve(&mut self, name: &str) -> Result<ConnectionDescriptor> {
        if let Some(descriptor) = self.resolved.get(name) {
            return Ok(descriptor.clone());
        }

        let entry = self
            .config
            .db
            .get(name)
            .ok_or_else(|| AppError::UnknownTarget {
                name: name.to_string(),
            })?;
        let descriptor = merge_descriptor(name, entry, &self.config.default)?;
        tracing::debug!(
            "Resolved db.{} to {}@{}:{}/{}",
            name,
            descriptor.user,
            descriptor.host,
            descriptor.port,
            descriptor.name
        );

        self.resolved.insert(name.to_string(), descriptor.clone());
        Ok(descriptor)
    }
}

/// Three-tier merge: target value, then `default` value, then fallback.
/// `name` has no fallback; `password` never reads from `default`.
pub fn merge_descriptor(
    target: &str,
    entry: &PartialDescriptor,
    default: &PartialDescriptor,
) -> Result<ConnectionDescriptor> {
    let host = pick(&entry.host, &default.host).unwrap_or(FALLBACK_HOST);
    let port = resolve_port(target, &entry.port, &default.port)?;
    let user = pick(&entry.user, &default.user).unwrap_or(FALLBACK_USER);

    let name = pick(&entry.name, &default.name)
        .ok_or_else(|| missing(target, RequiredField::Name))?;
    let password = non_empty(&entry.password)
        .ok_or_else(|| missing(target, RequiredField::Password))?;

    Ok(ConnectionDescriptor {
        host: host.to_string(),
        port,
        user: user.to_string(),
        name: name.to_string(),
        password: password.to_string(),
    })
}

fn resolve_port(
    target: &str,
    first: &Option<PortValue>,
    second: &Option<PortValue>,
) -> Result<u16> {
    let chosen = [first, second]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty());
    match chosen {
        None => Ok(FALLBACK_PORT),
        Some(value) => value.to_port().ok_or_else(|| AppError::InvalidPort {
            target: target.to_string(),
            value: value.to_string(),
        }),
    }
}

fn pick<'v>(first: &'v Option<String>, second: &'v Option<String>) -> Option<&'v str> {
    non_empty(first).or_else(|| non_empty(second))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn missing(target: &str, field: RequiredField) -> AppError {
    AppError::MissingField {
        target: target.to_string(),
        field,
    }
}
