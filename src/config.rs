use std::path::{Path, PathBuf};

/// Result-count limit handed to the scraper for every account.
pub const DEFAULT_LIMIT: usize = 20;

const MIN_BUFFER_BYTES: usize = 8 * 1024;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct AuditOptions {
    pub data_dir: PathBuf,            // holds data-<user>.ndjson / data-<user>.json
    pub limit: usize,                 // posts requested per account
    pub scraper_program: String,      // external scraper binary
    pub scraper_args: Vec<String>,    // leading args placed before the per-user args
    pub progress: bool,               // show progress bar on stderr
    pub color: bool,                  // ANSI colors in the report

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity

    // output formatting
    pub pretty_output: bool,          // pretty-print the JSON array artifact
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            limit: DEFAULT_LIMIT,
            scraper_program: "twint".to_string(),
            scraper_args: Vec::new(),
            progress: true,
            color: true,

            read_buffer_bytes: 64 * 1024,
            write_buffer_bytes: 64 * 1024,

            pretty_output: false,
        }
    }
}

impl AuditOptions {
    /// Defaults overlaid with `SOCIAL_AUDIT_*` environment variables.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();

        if let Ok(dir) = std::env::var("SOCIAL_AUDIT_DATA_DIR") {
            if !dir.trim().is_empty() {
                opts = opts.with_data_dir(dir.trim());
            }
        }

        if let Ok(raw) = std::env::var("SOCIAL_AUDIT_LIMIT") {
            match raw.trim().parse::<usize>() {
                Ok(n) => opts = opts.with_limit(n),
                Err(_) => tracing::warn!("SOCIAL_AUDIT_LIMIT is not a number, keeping {}: {}", opts.limit, raw),
            }
        }

        if let Ok(cmd) = std::env::var("SOCIAL_AUDIT_SCRAPER") {
            let mut parts = cmd.split_whitespace();
            match parts.next() {
                Some(program) => opts = opts.with_scraper(program, parts),
                None => tracing::warn!("SOCIAL_AUDIT_SCRAPER is set but empty, keeping {}", opts.scraper_program),
            }
        }

        if let Ok(raw) = std::env::var("SOCIAL_AUDIT_PRETTY") {
            match parse_flag(&raw) {
                Some(yes) => opts = opts.with_pretty_output(yes),
                None => tracing::warn!("SOCIAL_AUDIT_PRETTY should be true/false or 1/0: {}", raw),
            }
        }

        // https://no-color.org: any non-empty value disables color
        if std::env::var("NO_COLOR").map(|v| !v.is_empty()).unwrap_or(false) {
            opts = opts.with_color(false);
        }

        opts
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = n.max(1);
        self
    }
    pub fn with_scraper<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scraper_program = program.into();
        self.scraper_args = args.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_color(mut self, yes: bool) -> Self {
        self.color = yes;
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(MIN_BUFFER_BYTES);
        self.write_buffer_bytes = write_bytes.max(MIN_BUFFER_BYTES);
        self
    }

    pub fn with_pretty_output(mut self, yes: bool) -> Self {
        self.pretty_output = yes;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
