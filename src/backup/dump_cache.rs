// dbt/src/backup/dump_cache.rs
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::TargetResolver;
use crate::errors::{AppError, Result};
use crate::utils::pg_tools;
use crate::utils::CommandRunner;

pub const DEFAULT_DUMP_ROOT: &str = "./dump";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    Present,
}

/// Directory-format dumps kept under one root, one subdirectory per source
/// target name. A new dump for a name replaces the old one.
#[derive(Debug, Clone)]
pub struct DumpCache {
    root: PathBuf,
}

impl DumpCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DumpCache { root: root.into() }
    }

    /// The artifact directory for `source`. The name must be a single plain
    /// path component so the result always stays directly under the root.
    pub fn artifact_path(&self, source: &str) -> Result<PathBuf> {
        let mut components = Path::new(source).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == source => Ok(self.root.join(source)),
            _ => Err(AppError::InvalidTargetName {
                name: source.to_string(),
            }),
        }
    }

    pub fn state(&self, source: &str) -> Result<CacheState> {
        if self.artifact_path(source)?.is_dir() {
            Ok(CacheState::Present)
        } else {
            Ok(CacheState::Absent)
        }
    }

    /// Returns a dump directory for `source`, reusing the cached one when
    /// `reuse` is set and it exists, otherwise dumping afresh.
    pub fn ensure(
        &self,
        source: &str,
        reuse: bool,
        resolver: &mut TargetResolver<'_>,
        runner: &dyn CommandRunner,
    ) -> Result<PathBuf> {
        let dump_path = self.artifact_path(source)?;

        match (reuse, self.state(source)?) {
            (true, CacheState::Present) => {
                log_reused_artifact(source, &dump_path);
                return Ok(dump_path);
            }
            (true, CacheState::Absent) => {
                tracing::warn!(
                    "Dump not found for {} at {}, taking a fresh one",
                    source,
                    dump_path.display()
                );
            }
            (false, CacheState::Present) => {
                tracing::info!("Removing previous dump {}", dump_path.display());
                fs::remove_dir_all(&dump_path)?;
            }
            (false, CacheState::Absent) => {}
        }

        fs::create_dir_all(&self.root)?;

        let db = resolver.resolve(source)?;
        runner.execute(&pg_tools::pg_dump(&db, resolver.jobs(), &dump_path))?;

        println!("✓ Dump of {} written to {}", source, dump_path.display());
        Ok(dump_path)
    }
}

fn log_reused_artifact(source: &str, dump_path: &Path) {
    let taken_at = fs::metadata(dump_path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string());
    match taken_at {
        Ok(taken_at) => tracing::info!(
            "Using cached dump of {} from {} ({})",
            source,
            taken_at,
            dump_path.display()
        ),
        Err(_) => tracing::info!("Using cached dump of {} ({})", source, dump_path.display()),
    }
}
