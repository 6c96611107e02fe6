use anyhow::Result;
use clap::Parser;
use social_audit::{init_tracing_once, AuditOptions, SocialAudit};

/// Scrape recent posts for each account and print them oldest first.
///
/// Settings come from the environment: SOCIAL_AUDIT_DATA_DIR, SOCIAL_AUDIT_LIMIT,
/// SOCIAL_AUDIT_SCRAPER, SOCIAL_AUDIT_PRETTY, NO_COLOR and RUST_LOG.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Accounts to scrape (a leading @ is optional)
    #[arg(required = true)]
    usernames: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing_once();

    let summary = SocialAudit::from_options(AuditOptions::from_env()).run(args.usernames.as_slice())?;

    let failed = summary.failures().count();
    tracing::info!(
        accounts = summary.outcomes.len(),
        failed,
        rows = summary.table.len(),
        "run complete"
    );
    Ok(())
}
