// dbt/src/utils/pg_tools.rs
//! Argument vectors for the PostgreSQL client tools. The password always
//! travels in `PGPASSWORD`, never on the command line.
use std::path::Path;

use crate::config::ConnectionDescriptor;
use crate::utils::Invocation;

pub const PASSWORD_ENV: &str = "PGPASSWORD";

fn server(invocation: Invocation, db: &ConnectionDescriptor) -> Invocation {
    invocation
        .arg(format!("--host={}", db.host))
        .arg(format!("--port={}", db.port))
        .arg(format!("--username={}", db.user))
        .env(PASSWORD_ENV, &db.password)
}

/// Directory-format dump without ownership or privilege statements.
pub fn pg_dump(db: &ConnectionDescriptor, jobs: u32, dump_dir: &Path) -> Invocation {
    let invocation = Invocation::new("pg_dump")
        .arg("--no-owner")
        .arg("--no-privileges")
        .arg("--format=directory");
    server(invocation, db)
        .arg(format!("--dbname={}", db.name))
        .arg(format!("--jobs={}", jobs))
        .arg(format!("--file={}", dump_dir.display()))
}

pub fn dropdb_if_exists(db: &ConnectionDescriptor) -> Invocation {
    server(Invocation::new("dropdb").arg("--if-exists"), db).arg(db.name.as_str())
}

pub fn createdb(db: &ConnectionDescriptor) -> Invocation {
    server(Invocation::new("createdb"), db).arg(db.name.as_str())
}

/// Parallel restore that stops at the first failing object.
pub fn pg_restore(db: &ConnectionDescriptor, jobs: u32, dump_dir: &Path) -> Invocation {
    server(Invocation::new("pg_restore").arg("--exit-on-error"), db)
        .arg(format!("--dbname={}", db.name))
        .arg(format!("--jobs={}", jobs))
        .arg(dump_dir.display().to_string())
}

pub fn psql(db: &ConnectionDescriptor) -> Invocation {
    server(Invocation::new("psql"), db).arg(format!("--dbname={}", db.name))
}

pub fn psql_file(db: &ConnectionDescriptor, file: &Path) -> Invocation {
    psql(db).arg(format!("--file={}", file.display()))
}
