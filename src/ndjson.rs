use crate::util::open_with_backoff;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Minimal NDJSON reader with buffering and line counting.
/// Uses open-with-backoff for Windows-friendliness.
pub struct NdjsonReader {
    rdr: BufReader<File>,
    line_no: usize,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path)?;
        Ok(Self { rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f), line_no: 0 })
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }

    /// 1-based number of the line most recently returned by `read_line`.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn strips_crlf_and_counts_lines() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x.ndjson");
        fs::write(&p, "{\"a\":1}\r\n\n{\"b\":2}").unwrap();

        let mut r = NdjsonReader::open(&p, 0).unwrap();
        let mut buf = String::new();
        let mut got = Vec::new();
        while r.read_line(&mut buf).unwrap() > 0 {
            got.push((r.line_no(), buf.clone()));
        }
        assert_eq!(
            got,
            vec![(1, "{\"a\":1}".to_string()), (2, String::new()), (3, "{\"b\":2}".to_string())]
        );
    }
}
