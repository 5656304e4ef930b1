// dbt/src/restore/db_restore.rs
use std::path::Path;

use crate::config::ConnectionDescriptor;
use crate::errors::Result;
use crate::utils::pg_tools;
use crate::utils::CommandRunner;

/// Drops the target database if present and creates it empty. If the create
/// step fails the database is left absent.
pub fn recreate_database(db: &ConnectionDescriptor, runner: &dyn CommandRunner) -> Result<()> {
    println!("Recreating database '{}' on {}:{}...", db.name, db.host, db.port);

    runner.execute(&pg_tools::dropdb_if_exists(db))?;
    runner.execute(&pg_tools::createdb(db))?;

    println!("✓ Database '{}' recreated.", db.name);
    Ok(())
}

/// Loads a directory-format dump into an existing database, aborting at the
/// first object that fails to restore.
pub fn restore_dump(
    db: &ConnectionDescriptor,
    jobs: u32,
    dump_path: &Path,
    runner: &dyn CommandRunner,
) -> Result<()> {
    println!(
        "Restoring {} into database '{}' with {} jobs...",
        dump_path.display(),
        db.name,
        jobs
    );

    runner.execute(&pg_tools::pg_restore(db, jobs, dump_path))?;

    println!("✓ Restore into '{}' finished.", db.name);
    Ok(())
}
