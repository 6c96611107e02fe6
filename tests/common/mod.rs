#![allow(dead_code)]

use anyhow::bail;
use serde_json::{json, Value};
use social_audit::{ScrapeRequest, Scraper, SocialAudit};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One post shaped like twint's JSON output.
pub fn post(username: &str, id: u64, created_at: i64, tweet: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "date": "2021-03-04",
        "time": "12:30:00",
        "tweet": tweet,
        "hashtags": ["#rust"],
        "link": format!("https://twitter.com/{username}/status/{id}"),
        "created_at": created_at
    })
}

/// Write values as NDJSON, one per line.
pub fn write_ndjson(path: &Path, rows: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = fs::File::create(path).unwrap();
    for r in rows {
        writeln!(&mut f, "{}", r).unwrap();
    }
}

/// Read a JSON-array artifact back.
pub fn read_json_array(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Canned scraper: writes the configured posts for known accounts and fails for
/// unknown ones without writing anything. Records every request it receives.
#[derive(Clone, Default)]
pub struct StubScraper {
    pub posts: BTreeMap<String, Vec<Value>>,
    pub calls: Arc<Mutex<Vec<ScrapeRequest>>>,
}

impl StubScraper {
    pub fn with(mut self, username: &str, rows: Vec<Value>) -> Self {
        self.posts.insert(username.to_string(), rows);
        self
    }

    pub fn scraper(&self) -> Scraper {
        let posts = self.posts.clone();
        let calls = Arc::clone(&self.calls);
        Scraper::by_fn(move |req| {
            calls.lock().unwrap().push(req.clone());
            match posts.get(&req.username) {
                Some(rows) => {
                    write_ndjson(&req.output, rows);
                    Ok(())
                }
                None => bail!("no such account"),
            }
        })
    }

    pub fn called_usernames(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|r| r.username.clone()).collect()
    }
}

/// A fresh temp data directory (kept for the life of the test process).
pub fn data_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path().join("data")
}

pub fn audit(dir: &Path, stub: &StubScraper) -> SocialAudit {
    SocialAudit::new()
        .data_dir(dir)
        .progress(false)
        .color(false)
        .scraper(stub.scraper())
}

/// Run and capture everything written to the report stream.
pub fn run_captured(a: &SocialAudit, users: &[&str]) -> (social_audit::RunSummary, String) {
    let mut buf = Vec::new();
    let summary = a.run_to(users, &mut buf).unwrap();
    (summary, String::from_utf8(buf).unwrap())
}
