use crate::config::AuditOptions;
use crate::normalize::{format_data, IntermediateGuard};
use crate::paths::{normalize_username, UserPaths};
use crate::progress::make_count_progress;
use crate::report::{failure_line, Reporter};
use crate::scraper::{ScrapeRequest, Scraper};
use crate::table::TweetTable;
use crate::util::{init_tracing_once, remove_with_backoff};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result of scraping and normalizing one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserOutcome {
    Normalized { username: String, output: PathBuf, records: usize },
    Failed { username: String, reason: String },
}

impl UserOutcome {
    fn failed(username: &str, err: &anyhow::Error) -> Self {
        Self::Failed { username: username.to_string(), reason: format!("{err:#}") }
    }

    pub fn username(&self) -> &str {
        match self {
            UserOutcome::Normalized { username, .. } | UserOutcome::Failed { username, .. } => username,
        }
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            UserOutcome::Normalized { output, .. } => Some(output),
            UserOutcome::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UserOutcome::Normalized { .. })
    }
}

/// Everything one `run` produced, in input order.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub outcomes: Vec<UserOutcome>,
    pub table: TweetTable,
}

impl RunSummary {
    /// Output files of successful accounts, in processing order.
    pub fn output_files(&self) -> Vec<PathBuf> {
        output_files(&self.outcomes)
    }

    /// `(username, reason)` for every failed account.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            UserOutcome::Failed { username, reason } => Some((username.as_str(), reason.as_str())),
            UserOutcome::Normalized { .. } => None,
        })
    }
}

fn output_files(outcomes: &[UserOutcome]) -> Vec<PathBuf> {
    outcomes.iter().filter_map(|o| o.output().map(Path::to_path_buf)).collect()
}

#[derive(Clone, Debug)]
pub struct SocialAudit {
    pub(crate) opts: AuditOptions,
    scraper: Scraper,
}

impl Default for SocialAudit {
    fn default() -> Self {
        Self::new()
    }
}

impl SocialAudit {
    pub fn new() -> Self {
        Self::from_options(AuditOptions::default())
    }

    /// Uses the command scraper named in `opts`.
    pub fn from_options(opts: AuditOptions) -> Self {
        let scraper = Scraper::command(opts.scraper_program.clone(), opts.scraper_args.clone());
        Self { opts, scraper }
    }

    // -------- Builder methods --------
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_dir(dir); self }
    pub fn limit(mut self, n: usize) -> Self { self.opts = self.opts.with_limit(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn color(mut self, yes: bool) -> Self { self.opts = self.opts.with_color(yes); self }
    pub fn pretty_output(mut self, yes: bool) -> Self { self.opts = self.opts.with_pretty_output(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }
    pub fn scraper(mut self, scraper: Scraper) -> Self { self.scraper = scraper; self }

    pub fn options(&self) -> &AuditOptions {
        &self.opts
    }

    /// Scrape, normalize, aggregate and print to stdout.
    pub fn run<S: AsRef<str>>(&self, usernames: &[S]) -> Result<RunSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(usernames, &mut out)
    }

    /// Same as [`run`](Self::run), writing diagnostics and the report to `out`.
    ///
    /// Accounts are processed one at a time in input order. A failing account is
    /// reported and skipped; errors while building or printing the table abort the run.
    pub fn run_to<S: AsRef<str>, W: Write>(&self, usernames: &[S], out: &mut W) -> Result<RunSummary> {
        init_tracing_once();
        fs::create_dir_all(&self.opts.data_dir)
            .with_context(|| format!("create data dir {}", self.opts.data_dir.display()))?;

        let pb = if self.opts.progress { Some(make_count_progress(usernames.len() as u64, "Scraping")) } else { None };

        let mut outcomes = Vec::with_capacity(usernames.len());
        for raw in usernames {
            let raw = raw.as_ref();
            if let Some(pb) = &pb { pb.set_message(format!("Scraping @{}", raw.trim())); }

            let outcome = self.process_user(raw);
            if let UserOutcome::Failed { username, reason } = &outcome {
                tracing::warn!(username = %username, error = %reason, "skipping account");
                let line = failure_line(username, reason);
                match &pb {
                    Some(pb) => pb.suspend(|| writeln!(out, "{line}"))?,
                    None => writeln!(out, "{line}")?,
                }
            }
            outcomes.push(outcome);

            if let Some(pb) = &pb { pb.inc(1); }
        }
        if let Some(pb) = pb { pb.finish_and_clear(); }

        let table = self.make_dataframe(&outcomes)?;
        self.print_scrape(&table, out)?;

        Ok(RunSummary { outcomes, table })
    }

    /// Clear stale files, scrape, and normalize a single account.
    /// Never fails; problems come back as `UserOutcome::Failed`.
    pub fn process_user(&self, raw: &str) -> UserOutcome {
        let username = match normalize_username(raw) {
            Ok(u) => u,
            Err(e) => return UserOutcome::failed(raw.trim(), &e),
        };
        let paths = UserPaths::new(&self.opts.data_dir, &username);
        match self.scrape_and_format(&username, &paths) {
            Ok(records) => UserOutcome::Normalized { username, output: paths.output, records },
            Err(e) => UserOutcome::failed(&username, &e),
        }
    }

    fn scrape_and_format(&self, username: &str, paths: &UserPaths) -> Result<usize> {
        clear_old_data(paths)?;

        // removes the NDJSON file however this function exits
        let _guard = IntermediateGuard::new(&paths.intermediate);

        let req = ScrapeRequest { username: username.to_string(), limit: self.opts.limit, output: paths.intermediate.clone() };
        tracing::info!(username, limit = req.limit, "scraping");
        self.scraper.scrape(&req).with_context(|| format!("scrape @{username}"))?;

        format_data(username, paths, &self.opts)
    }

    /// Load every successful account's output into one table sorted by `created_at`.
    pub fn make_dataframe(&self, outcomes: &[UserOutcome]) -> Result<TweetTable> {
        let files = output_files(outcomes);
        if files.is_empty() {
            tracing::warn!("No account produced output; nothing to report.");
        }
        TweetTable::load(&files).context("build tweet table")
    }

    pub fn print_scrape<W: Write>(&self, table: &TweetTable, out: &mut W) -> Result<()> {
        Reporter::new(self.opts.color).print_scrape(table, out).context("write report")
    }
}

/// Drop output (and any leftover intermediate/temp file) from a previous run.
fn clear_old_data(paths: &UserPaths) -> Result<()> {
    for p in [&paths.output, &paths.intermediate, &paths.output_tmp()] {
        if remove_with_backoff(p)? {
            tracing::debug!(path=%p.display(), "removed stale file");
        }
    }
    Ok(())
}
