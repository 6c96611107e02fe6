//! Post records as produced by the scraper, kept verbatim, plus the helpers the
//! table and report need to read individual fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// One scraped post. Any JSON object is accepted; no schema is enforced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostRecord(pub Map<String, Value>);

impl PostRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field rendered for display: strings as-is, missing/null as empty,
    /// anything else as its JSON text.
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn username(&self) -> String { self.text("username") }
    pub fn time(&self) -> String { self.text("time") }
    pub fn tweet(&self) -> String { self.text("tweet") }
    pub fn link(&self) -> String { self.text("link") }

    /// Calendar part of `date` (everything before the first space).
    pub fn date_only(&self) -> String {
        let date = self.text("date");
        date.split(' ').next().unwrap_or_default().to_string()
    }

    /// Hashtags joined by single spaces.
    pub fn hashtags(&self) -> String {
        match self.0.get("hashtags") {
            Some(Value::Array(tags)) => tags
                .iter()
                .map(|t| match t {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            _ => self.text("hashtags"),
        }
    }

    pub fn created_at(&self) -> CreatedAt {
        CreatedAt::from_value(self.0.get("created_at"))
    }
}

impl From<Map<String, Value>> for PostRecord {
    fn from(m: Map<String, Value>) -> Self {
        Self(m)
    }
}

/// Sort key derived from `created_at`.
/// Numeric keys first (ascending), then unparsed strings (lexicographic), then missing.
#[derive(Clone, Debug, PartialEq)]
pub enum CreatedAt {
    /// Epoch milliseconds for parsed date strings; raw value for JSON numbers.
    Number(f64),
    Text(String),
    Missing,
}

impl CreatedAt {
    pub fn from_value(v: Option<&Value>) -> Self {
        match v {
            Some(Value::Number(n)) => n.as_f64().map(CreatedAt::Number).unwrap_or(CreatedAt::Missing),
            Some(Value::String(s)) => match parse_timestamp_str(s) {
                Some(n) => CreatedAt::Number(n),
                None => CreatedAt::Text(s.clone()),
            },
            _ => CreatedAt::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CreatedAt::Number(_) => 0,
            CreatedAt::Text(_) => 1,
            CreatedAt::Missing => 2,
        }
    }
}

impl Eq for CreatedAt {}

impl Ord for CreatedAt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CreatedAt::Number(a), CreatedAt::Number(b)) => a.total_cmp(b),
            (CreatedAt::Text(a), CreatedAt::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CreatedAt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Accepts plain numbers, RFC 3339, and twint's `YYYY-MM-DD HH:MM:SS UTC` / `+0000` forms.
/// Dates come back as epoch milliseconds.
fn parse_timestamp_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<f64>() {
        return n.is_finite().then_some(n);
    }
    let dt = OffsetDateTime::parse(s, &Rfc3339)
        .ok()
        .or_else(|| {
            let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
            PrimitiveDateTime::parse(s, fmt).ok().map(|p| p.assume_utc())
        })
        .or_else(|| {
            let fmt = format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
            );
            OffsetDateTime::parse(s, fmt).ok()
        })?;
    Some((dt.unix_timestamp_nanos() / 1_000_000) as f64)
}
