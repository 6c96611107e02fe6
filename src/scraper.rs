use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// What the scraper is asked to do for one account.
/// Output is always line-delimited JSON, one post per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub username: String,
    pub limit: usize,
    pub output: PathBuf,
}

/// The external collaborator that fetches posts.
///
/// Two flavors:
///  - `command(..)` runs a twint-compatible CLI
///  - `by_fn(..)` wraps a closure (tests, embedding another scraper)
///
/// Only the side effect matters: on success the NDJSON file at
/// `ScrapeRequest::output` should exist.
#[derive(Clone)]
pub enum Scraper {
    Command { program: String, args: Vec<String> },
    ByFn(Arc<dyn Fn(&ScrapeRequest) -> Result<()> + Send + Sync>),
}

impl Scraper {
    pub fn command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Command { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }

    pub fn by_fn(f: impl Fn(&ScrapeRequest) -> Result<()> + Send + Sync + 'static) -> Self {
        Self::ByFn(Arc::new(f))
    }

    pub fn scrape(&self, req: &ScrapeRequest) -> Result<()> {
        match self {
            Scraper::Command { program, args } => run_command(program, args, req),
            Scraper::ByFn(f) => f(req),
        }
    }
}

impl std::fmt::Debug for Scraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scraper::Command { program, args } => f.debug_struct("Command").field("program", program).field("args", args).finish(),
            Scraper::ByFn(_) => f.write_str("ByFn(..)"),
        }
    }
}

/// Arguments appended after any configured leading args:
/// `-u <user> --limit <n> --json -o <path>`.
pub fn command_args(req: &ScrapeRequest) -> Vec<String> {
    vec![
        "-u".to_string(),
        req.username.clone(),
        "--limit".to_string(),
        req.limit.to_string(),
        "--json".to_string(),
        "-o".to_string(),
        req.output.display().to_string(),
    ]
}

fn run_command(program: &str, leading: &[String], req: &ScrapeRequest) -> Result<()> {
    let output = Command::new(program)
        .args(leading)
        .args(command_args(req))
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("spawn scraper `{}`", program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
        bail!("scraper `{}` exited with {}: {}", program, output.status, tail);
    }
    ensure_written(&req.output, program)
}

fn ensure_written(path: &Path, program: &str) -> Result<()> {
    if !path.exists() {
        bail!("scraper `{}` finished but wrote nothing to {}", program, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> ScrapeRequest {
        ScrapeRequest { username: "alice".into(), limit: 20, output: PathBuf::from("data/data-alice.ndjson") }
    }

    #[test]
    fn twint_arguments() {
        assert_eq!(
            command_args(&req()),
            vec!["-u", "alice", "--limit", "20", "--json", "-o", "data/data-alice.ndjson"]
        );
    }

    #[test]
    fn missing_program_is_an_error() {
        let s = Scraper::command("social-audit-no-such-scraper-binary", Vec::<String>::new());
        let err = s.scrape(&req()).unwrap_err();
        assert!(format!("{err:#}").contains("spawn scraper"));
    }

    #[test]
    fn closure_scraper_is_called_with_request() {
        let s = Scraper::by_fn(|r| {
            assert_eq!(r.username, "alice");
            anyhow::bail!("stub failure")
        });
        assert!(s.scrape(&req()).is_err());
    }
}
