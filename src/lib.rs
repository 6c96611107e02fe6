mod config;
mod paths;
mod util;
mod progress;

mod ndjson;
mod record;
mod scraper;
mod normalize;
mod table;
mod report;
mod pipeline;

pub use crate::config::{AuditOptions, DEFAULT_LIMIT};
pub use crate::pipeline::{RunSummary, SocialAudit, UserOutcome};

// Expose path helpers so callers can locate the per-account artifacts.
pub use crate::paths::{normalize_username, UserPaths};

// Scraper collaborator seam.
pub use crate::scraper::{ScrapeRequest, Scraper};

// Records, table and report building blocks.
pub use crate::record::{CreatedAt, PostRecord};
pub use crate::table::TweetTable;
pub use crate::report::Reporter;

// NDJSON helpers and the normalizer stage.
pub use crate::ndjson::NdjsonReader;
pub use crate::normalize::{format_data, read_records, IntermediateGuard};

pub use crate::util::init_tracing_once;
