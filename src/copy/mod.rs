// dbt/src/copy/mod.rs
pub(crate) mod logic;

use crate::backup::DumpCache;
use crate::config::{AppConfig, TargetResolver};
use crate::errors::Result;
use crate::utils::CommandRunner;

#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub source: String,
    pub target: String,
    pub use_cache: bool,
}

/// Public entry point for the copy process.
pub fn run_copy_flow(
    app_config: &AppConfig,
    cache: &DumpCache,
    request: &CopyRequest,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let mut resolver = TargetResolver::new(app_config);
    logic::perform_copy_orchestration(&mut resolver, cache, request, runner)
}
