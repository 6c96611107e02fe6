//! NDJSON -> JSON array normalization for one account.

use crate::config::AuditOptions;
use crate::ndjson::NdjsonReader;
use crate::paths::UserPaths;
use crate::record::PostRecord;
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Deletes the intermediate NDJSON file when dropped, on every exit path.
pub struct IntermediateGuard {
    path: PathBuf,
}

impl IntermediateGuard {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IntermediateGuard {
    fn drop(&mut self) {
        match remove_with_backoff(&self.path) {
            Ok(true) => tracing::debug!(path=%self.path.display(), "removed intermediate file"),
            Ok(false) => {}
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(path=%self.path.display(), error=%err, "failed removing intermediate file");
            }
        }
    }
}

/// Parse every line of an NDJSON file into records. Any line that is not a
/// JSON object, blank lines included, fails the whole file. A final `\n` does
/// not count as an extra line.
pub fn read_records(path: &Path, read_buf: usize) -> Result<Vec<PostRecord>> {
    let mut rdr = NdjsonReader::open(path, read_buf).with_context(|| format!("open {}", path.display()))?;
    let mut records = Vec::new();
    let mut line = String::new();
    while rdr.read_line(&mut line).with_context(|| format!("read {}", path.display()))? > 0 {
        let rec: PostRecord = serde_json::from_str(&line)
            .with_context(|| format!("parse {} line {}", path.display(), rdr.line_no()))?;
        records.push(rec);
    }
    Ok(records)
}

/// Write records as one JSON array to a temp sibling, then promote it over `paths.output`.
pub fn write_json_array(records: &[PostRecord], paths: &UserPaths, pretty: bool, write_buf: usize) -> Result<()> {
    let tmp = paths.output_tmp();
    let res = (|| -> Result<()> {
        let f = create_with_backoff(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(write_buf, f);
        if pretty {
            serde_json::to_writer_pretty(&mut w, records)?;
        } else {
            serde_json::to_writer(&mut w, records)?;
        }
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
        Ok(())
    })();
    if let Err(e) = res {
        let _ = remove_with_backoff(&tmp);
        return Err(e);
    }
    replace_file_atomic_backoff(&tmp, &paths.output)
}

/// Read the account's NDJSON file, write its records as a JSON array to the
/// output path, and return how many records were written.
///
/// The intermediate file itself is left alone here; callers hold an
/// [`IntermediateGuard`] for it.
pub fn format_data(username: &str, paths: &UserPaths, opts: &AuditOptions) -> Result<usize> {
    let records = read_records(&paths.intermediate, opts.read_buffer_bytes)?;
    tracing::info!(username, records = records.len(), "finished reading tweets into memory");

    write_json_array(&records, paths, opts.pretty_output, opts.write_buffer_bytes)?;
    tracing::info!(username, path=%paths.output.display(), "finished writing tweets to file");

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;

    fn setup() -> (tempfile::TempDir, UserPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = UserPaths::new(dir.path(), "alice");
        (dir, paths)
    }

    #[test]
    fn ndjson_becomes_json_array() {
        let (_dir, paths) = setup();
        let lines = [json!({"id": 1, "tweet": "a"}), json!({"id": 2, "tweet": "b"})];
        let body: String = lines.iter().map(|v| format!("{v}\n")).collect();
        fs::write(&paths.intermediate, body).unwrap();

        let n = format_data("alice", &paths, &AuditOptions::default()).unwrap();
        assert_eq!(n, 2);

        let out: Value = serde_json::from_str(&fs::read_to_string(&paths.output).unwrap()).unwrap();
        assert_eq!(out, json!([{"id": 1, "tweet": "a"}, {"id": 2, "tweet": "b"}]));
        assert!(!paths.output_tmp().exists());
    }

    #[test]
    fn bad_line_fails_whole_batch_and_names_line() {
        let (_dir, paths) = setup();
        fs::write(&paths.intermediate, "{\"id\":1}\nnot json\n").unwrap();

        let err = format_data("alice", &paths, &AuditOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(!paths.output.exists());
    }

    #[test]
    fn blank_line_fails_batch_but_trailing_newline_does_not() {
        let (_dir, paths) = setup();
        fs::write(&paths.intermediate, "{\"id\":1}\n\n{\"id\":2}\n").unwrap();
        let err = format_data("alice", &paths, &AuditOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));

        fs::write(&paths.intermediate, "{\"id\":1}\n{\"id\":2}\n").unwrap();
        assert_eq!(format_data("alice", &paths, &AuditOptions::default()).unwrap(), 2);
    }

    #[test]
    fn missing_intermediate_is_an_error() {
        let (_dir, paths) = setup();
        assert!(format_data("alice", &paths, &AuditOptions::default()).is_err());
    }

    #[test]
    fn guard_removes_file_on_drop() {
        let (_dir, paths) = setup();
        fs::write(&paths.intermediate, "{}\n").unwrap();
        {
            let g = IntermediateGuard::new(&paths.intermediate);
            assert!(g.path().exists());
        }
        assert!(!paths.intermediate.exists());
    }
}
