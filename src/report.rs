//! Console report: a fixed five-line, color-coded block per post.

use crate::record::PostRecord;
use crate::table::TweetTable;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug)]
enum Style {
    Neutral,
    Warning,
    Success,
    Highlight,
    Info,
}

#[derive(Clone, Copy, Debug)]
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, s: &str, style: Style) -> String {
        if !self.color {
            return s.to_string();
        }
        let c: ColoredString = match style {
            Style::Neutral => s.normal(),
            Style::Warning => s.red(),
            Style::Success => s.green(),
            Style::Highlight => s.truecolor(255, 165, 0),
            Style::Info => s.blue(),
        };
        c.to_string()
    }

    /// username / date time / tab+text / hashtags / link, then a blank line.
    pub fn render_row(&self, r: &PostRecord) -> String {
        let when = format!("{} {}", r.date_only(), r.time());
        format!(
            "{}\n{}\n\t{}\n{}\n{}\n\n",
            self.paint(&r.username(), Style::Neutral),
            self.paint(&when, Style::Warning),
            self.paint(&r.tweet(), Style::Success),
            self.paint(&r.hashtags(), Style::Highlight),
            self.paint(&r.link(), Style::Info),
        )
    }

    pub fn print_scrape<W: Write>(&self, table: &TweetTable, out: &mut W) -> io::Result<()> {
        for row in table {
            out.write_all(self.render_row(row).as_bytes())?;
        }
        out.flush()
    }
}

/// Line printed when an account could not be scraped or normalized.
pub fn failure_line(username: &str, reason: &str) -> String {
    format!("Could not scrape @{username}: {reason}")
}
