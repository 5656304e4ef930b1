// dbt/src/session/mod.rs
//! psql against a named target: an interactive shell or a single script.
use std::path::Path;

use crate::config::{AppConfig, TargetResolver};
use crate::errors::Result;
use crate::utils::pg_tools;
use crate::utils::CommandRunner;

/// Opens an interactive psql session; returns when the operator quits it.
pub fn connect(app_config: &AppConfig, target: &str, runner: &dyn CommandRunner) -> Result<()> {
    let db = TargetResolver::new(app_config).resolve(target)?;
    runner.execute(&pg_tools::psql(&db))
}

pub fn run_file(
    app_config: &AppConfig,
    target: &str,
    file: &Path,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let db = TargetResolver::new(app_config).resolve(target)?;
    runner.execute(&pg_tools::psql_file(&db, file))
}
