pub(crate) mod catalog;
pub(crate) mod enrollment;
pub(crate) mod seed;
pub(crate) mod students;

use anyhow::{Context, Result, anyhow, bail};
use registrar::Registrar;
use registrar::domain::{Course, Student};
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads one line from stdin, prompting only when stdin is a terminal.
pub(crate) async fn read_password() -> Result<String> {
    if std::io::stdin().is_terminal() {
        eprint!("Password: ");
    }
    let line = BufReader::new(tokio::io::stdin())
        .lines()
        .next_line()
        .await
        .context("Reading password from stdin")?;
    let password = line.as_deref().map(|l| l.trim_end_matches('\r')).unwrap_or_default();
    if password.is_empty() {
        bail!("No password on stdin");
    }
    Ok(password.to_owned())
}

/// Accepts a username first, then a student id.
pub(crate) async fn resolve_student(registrar: &Registrar, key: &str) -> Result<Student> {
    registrar.accounts().lookup(key).await?.ok_or_else(|| anyhow!("Unknown student '{key}'"))
}

/// Accepts a course code first, then a course id.
pub(crate) async fn resolve_course(registrar: &Registrar, key: &str) -> Result<Course> {
    if let Some(course) = registrar.catalog().find_by_code(key).await? {
        return Ok(course);
    }
    registrar.catalog().find_by_id(key).await?.ok_or_else(|| anyhow!("Unknown course '{key}'"))
}
