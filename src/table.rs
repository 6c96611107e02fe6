//! Unified, chronologically sorted view over every normalized output file of a run.

use crate::record::PostRecord;
use crate::util::open_with_backoff;
use anyhow::{Context, Result};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TweetTable {
    rows: Vec<PostRecord>,
}

impl TweetTable {
    /// Load each JSON-array file in order, concatenate the rows, and sort by `created_at`.
    /// Any missing or malformed file is an error.
    pub fn load(files: &[PathBuf]) -> Result<Self> {
        let mut rows = Vec::new();
        for path in files {
            rows.extend(load_json_array(path)?);
        }
        tracing::info!(files = files.len(), rows = rows.len(), "loaded tweet table");
        Ok(Self::from_records(rows))
    }

    /// Build a table from records already in memory; rows are sorted.
    pub fn from_records(rows: Vec<PostRecord>) -> Self {
        let mut t = Self { rows };
        t.sort_by_created_at();
        t
    }

    /// Ascending by `created_at`; ties keep their input order.
    fn sort_by_created_at(&mut self) {
        self.rows.sort_by_cached_key(|r| r.created_at());
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn rows(&self) -> &[PostRecord] { &self.rows }
    pub fn iter(&self) -> std::slice::Iter<'_, PostRecord> { self.rows.iter() }
}

impl<'a> IntoIterator for &'a TweetTable {
    type Item = &'a PostRecord;
    type IntoIter = std::slice::Iter<'a, PostRecord>;
    fn into_iter(self) -> Self::IntoIter { self.rows.iter() }
}

fn load_json_array(path: &Path) -> Result<Vec<PostRecord>> {
    let f = open_with_backoff(path).with_context(|| format!("open {}", path.display()))?;
    let rows: Vec<PostRecord> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    Ok(rows)
}
