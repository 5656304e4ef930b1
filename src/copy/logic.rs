// dbt/src/copy/logic.rs
use crate::backup::DumpCache;
use crate::config::TargetResolver;
use crate::copy::CopyRequest;
use crate::errors::Result;
use crate::restore;
use crate::utils::CommandRunner;

/// Copies one target's contents over another's.
///
/// 1. Obtains a dump of the source (cached or fresh).
/// 2. Resolves the target.
/// 3. Drops the target database if it exists.
/// 4. Creates it empty.
/// 5. Restores the dump into it.
///
/// Each step waits for the previous one. Nothing is rolled back: a failure
/// after step 3 leaves the target absent, empty or partially loaded.
pub fn perform_copy_orchestration(
    resolver: &mut TargetResolver<'_>,
    cache: &DumpCache,
    request: &CopyRequest,
    runner: &dyn CommandRunner,
) -> Result<()> {
    println!("🔄 Copying {} -> {}", request.source, request.target);

    let dump_path = cache.ensure(&request.source, request.use_cache, resolver, runner)?;

    let target = resolver.resolve(&request.target)?;

    restore::recreate_database(&target, runner)?;
    restore::restore_dump(&target, resolver.jobs(), &dump_path, runner)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::copy::run_copy_flow;
    use crate::errors::AppError;
    use crate::utils::testing::RecordingRunner;
    use serde_json::json;
    use std::fs;

    fn config() -> AppConfig {
        let content = json!({
            "jobs": 8,
            "default": { "host": "db.local", "port": 5432, "user": "postgres" },
            "db": {
                "prod": { "name": "proddb", "password": "p2" },
                "staging": { "name": "stagingdb", "password": "p1", "host": "staging.local" },
                "nameless": { "password": "p3" }
            }
        });
        AppConfig::from_json_str(&content.to_string()).unwrap()
    }

    fn request(source: &str, target: &str, use_cache: bool) -> CopyRequest {
        CopyRequest {
            source: source.to_string(),
            target: target.to_string(),
            use_cache,
        }
    }

    #[test]
    fn test_copy_runs_four_steps_in_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::default();

        run_copy_flow(&config(), &cache, &request("prod", "staging", false), &runner)?;

        assert_eq!(runner.programs(), vec!["pg_dump", "dropdb", "createdb", "pg_restore"]);

        let calls = runner.calls.borrow();
        assert_eq!(calls[0].env.get("PGPASSWORD").map(String::as_str), Some("p2"));
        for call in &calls[1..] {
            assert_eq!(call.env.get("PGPASSWORD").map(String::as_str), Some("p1"));
            assert!(call.args.contains(&"--host=staging.local".to_string()));
        }
        let restore_source = cache.artifact_path("prod")?.display().to_string();
        assert_eq!(calls[3].args.last(), Some(&restore_source));
        assert!(calls[3].args.contains(&"--jobs=8".to_string()));
        assert!(calls[3].args.contains(&"--exit-on-error".to_string()));
        Ok(())
    }

    #[test]
    fn test_copy_with_cached_dump_skips_dump() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        fs::create_dir_all(cache.artifact_path("prod")?)?;
        let runner = RecordingRunner::default();

        run_copy_flow(&config(), &cache, &request("prod", "staging", true), &runner)?;

        assert_eq!(runner.programs(), vec!["dropdb", "createdb", "pg_restore"]);
        Ok(())
    }

    #[test]
    fn test_copy_with_missing_cache_dumps_anyway() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::default();

        run_copy_flow(&config(), &cache, &request("prod", "staging", true), &runner)?;

        assert_eq!(runner.programs(), vec!["pg_dump", "dropdb", "createdb", "pg_restore"]);
        Ok(())
    }

    #[test]
    fn test_restore_failure_stops_after_recreate() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::failing_on("pg_restore");

        let result = run_copy_flow(&config(), &cache, &request("prod", "staging", false), &runner);

        assert!(matches!(
            result,
            Err(AppError::ProcessFailure { ref program, .. }) if program == "pg_restore"
        ));
        // One restore attempt, no retry.
        assert_eq!(runner.programs(), vec!["pg_dump", "dropdb", "createdb", "pg_restore"]);
        Ok(())
    }

    #[test]
    fn test_dump_failure_leaves_target_untouched() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::failing_on("pg_dump");

        let result = run_copy_flow(&config(), &cache, &request("prod", "staging", false), &runner);

        assert!(result.is_err());
        assert_eq!(runner.programs(), vec!["pg_dump"]);
        Ok(())
    }

    #[test]
    fn test_create_failure_skips_restore() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::failing_on("createdb");

        let result = run_copy_flow(&config(), &cache, &request("prod", "staging", false), &runner);

        assert!(result.is_err());
        assert_eq!(runner.programs(), vec!["pg_dump", "dropdb", "createdb"]);
        Ok(())
    }

    #[test]
    fn test_unresolvable_target_fails_after_dump() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::default();

        let result = run_copy_flow(&config(), &cache, &request("prod", "nameless", false), &runner);

        assert!(matches!(result, Err(AppError::MissingField { .. })));
        assert_eq!(runner.programs(), vec!["pg_dump"]);
        assert!(cache.artifact_path("prod")?.is_dir());
        Ok(())
    }

    #[test]
    fn test_unknown_source_fails_before_any_tool() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = DumpCache::new(dir.path().join("dump"));
        let runner = RecordingRunner::default();

        let result = run_copy_flow(&config(), &cache, &request("qa", "staging", false), &runner);

        assert!(matches!(result, Err(AppError::UnknownTarget { .. })));
        assert!(runner.calls.borrow().is_empty());
        Ok(())
    }
}
