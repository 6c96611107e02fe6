//! Per-account file layout inside the data directory.

use anyhow::{bail, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,50}$").expect("username regex"))
}

/// Trim and drop one leading `@`, then check the handle is safe to embed in a filename.
pub fn normalize_username(raw: &str) -> Result<String> {
    let s = raw.trim();
    let s = s.strip_prefix('@').unwrap_or(s);
    if !username_re().is_match(s) {
        bail!("invalid username {:?}: expected 1-50 letters, digits or underscores", raw);
    }
    Ok(s.to_string())
}

/// Files owned by one account for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPaths {
    /// Line-delimited scraper output; removed once the account is processed.
    pub intermediate: PathBuf,
    /// JSON array artifact left on disk after the run.
    pub output: PathBuf,
}

impl UserPaths {
    pub fn new(data_dir: &Path, username: &str) -> Self {
        Self {
            intermediate: data_dir.join(format!("data-{username}.ndjson")),
            output: data_dir.join(format!("data-{username}.json")),
        }
    }

    /// Sibling used while writing `output`, promoted atomically when complete.
    pub fn output_tmp(&self) -> PathBuf {
        let mut os = self.output.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_embed_username() {
        let p = UserPaths::new(Path::new("./data"), "alice");
        assert_eq!(p.intermediate, PathBuf::from("./data/data-alice.ndjson"));
        assert_eq!(p.output, PathBuf::from("./data/data-alice.json"));
        assert_eq!(p.output_tmp(), PathBuf::from("./data/data-alice.json.tmp"));
    }

    #[test]
    fn usernames_are_normalized() {
        assert_eq!(normalize_username("  @rustlang ").unwrap(), "rustlang");
        assert_eq!(normalize_username("a_b_1").unwrap(), "a_b_1");
    }

    #[test]
    fn unsafe_usernames_are_rejected() {
        for bad in ["", "@", "../etc", "a/b", "two words", "@@x"] {
            assert!(normalize_username(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
