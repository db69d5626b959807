//! # Normalizer
//!
//! Maps one raw record of a declared origin into a [`NormalizedItem`].
//!
//! The per-origin schema lives in [`FIELD_MAPS`]: which raw field feeds the
//! title, description, date, popularity and link of the canonical record,
//! plus the labels cards print for that origin. Adding an origin means adding
//! one entry there (and an adapter).
//!
//! Normalization is total. Missing optional fields never fail:
//! - description falls back to `""`
//! - popularity falls back to `0`
//! - an absent or unparseable date falls back to `now` (`has_date = false`)
//! - the title falls back through identifier fields, then `"(untitled <origin>)"`
//!
//! Records with the date fallback sort first under "recent"; cards render
//! them as undated.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::ingest::types::RawItem;
use crate::origin::Origin;

/// Where an item's external link comes from.
#[derive(Debug, Clone, Copy)]
pub enum UrlSource {
    /// Copy a raw string field.
    Field(&'static str),
    /// `prefix` + the value of a raw field.
    Template(&'static str, &'static str),
}

/// Labels the card renderer uses for an origin.
#[derive(Debug, Clone, Copy)]
pub struct CardLabels {
    /// e.g. `Upvotes: `; `None` hides the stats line.
    pub stats_prefix: Option<&'static str>,
    pub date_prefix: &'static str,
    pub link_label: &'static str,
    /// Shown when the description is empty; `None` leaves it empty.
    pub empty_description: Option<&'static str>,
    /// Shown instead of the count when the popularity field is absent.
    pub missing_stats: Option<&'static str>,
}

/// Raw-field → canonical-field mapping for one origin.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub origin: Origin,
    /// First non-blank wins.
    pub title: &'static [&'static str],
    pub description: &'static [&'static str],
    pub date: &'static [&'static str],
    pub popularity: Option<&'static str>,
    pub url: &'static [UrlSource],
    pub labels: CardLabels,
}

pub static FIELD_MAPS: [FieldMap; 4] = [
    FieldMap {
        origin: Origin::News,
        title: &["title", "objectID"],
        description: &["story_text"],
        date: &["created_at"],
        popularity: Some("points"),
        url: &[
            UrlSource::Field("url"),
            UrlSource::Template("https://news.ycombinator.com/item?id=", "objectID"),
        ],
        labels: CardLabels {
            stats_prefix: Some("Upvotes: "),
            date_prefix: "Posted",
            link_label: "Read More",
            empty_description: None,
            missing_stats: None,
        },
    },
    FieldMap {
        origin: Origin::Preprint,
        title: &["title", "link"],
        description: &["summary"],
        date: &["published", "updated"],
        // No intrinsic metric; always 0.
        popularity: None,
        url: &[UrlSource::Field("link")],
        labels: CardLabels {
            stats_prefix: None,
            date_prefix: "Published",
            link_label: "Read Paper",
            empty_description: None,
            missing_stats: None,
        },
    },
    FieldMap {
        origin: Origin::Repository,
        title: &["name", "full_name"],
        description: &["description"],
        date: &["created_at"],
        popularity: Some("stargazers_count"),
        url: &[UrlSource::Field("html_url")],
        labels: CardLabels {
            stats_prefix: Some("⭐ "),
            date_prefix: "Created",
            link_label: "View Repository",
            empty_description: None,
            missing_stats: None,
        },
    },
    FieldMap {
        origin: Origin::Model,
        title: &["modelId", "id"],
        description: &["description"],
        date: &["lastModified", "createdAt"],
        popularity: Some("downloads"),
        url: &[
            UrlSource::Template("https://huggingface.co/", "modelId"),
            UrlSource::Template("https://huggingface.co/", "id"),
        ],
        labels: CardLabels {
            stats_prefix: Some("Downloads: "),
            date_prefix: "Last Modified",
            link_label: "View Model",
            empty_description: Some("No description available"),
            missing_stats: Some("N/A"),
        },
    },
];

impl Origin {
    pub fn field_map(self) -> &'static FieldMap {
        let idx = match self {
            Origin::News => 0,
            Origin::Preprint => 1,
            Origin::Repository => 2,
            Origin::Model => 3,
        };
        &FIELD_MAPS[idx]
    }
}

/// Canonical, comparable form of a content entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub id: String,
    pub origin: Origin,
    pub display_title: String,
    pub display_description: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// False when `timestamp` is the "now" fallback.
    pub has_date: bool,
    pub popularity: u64,
    pub url: Option<String>,
    /// Untouched raw record, for presentation.
    pub fields: RawItem,
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Normalize with the wall clock as the date fallback.
pub fn normalize(raw: &RawItem, origin: Origin) -> NormalizedItem {
    normalize_at(raw, origin, now_ms())
}

/// Normalize every raw record of one origin against a single clock reading.
pub fn normalize_all(raws: &[RawItem], origin: Origin, now_ms: i64) -> Vec<NormalizedItem> {
    raws.iter().map(|r| normalize_at(r, origin, now_ms)).collect()
}

pub fn normalize_at(raw: &RawItem, origin: Origin, now_ms: i64) -> NormalizedItem {
    let map = origin.field_map();

    let display_title = first_text(raw, map.title, plain_text)
        .unwrap_or_else(|| format!("(untitled {origin})"));
    let display_description = first_text(raw, map.description, clean_text).unwrap_or_default();
    let date = first_timestamp(raw, map.date);
    let popularity = map
        .popularity
        .and_then(|f| raw.get(f))
        .map(popularity_of)
        .unwrap_or(0);
    let url = resolve_url(raw, map.url);

    NormalizedItem {
        id: item_id(origin, url.as_deref().unwrap_or(&display_title)),
        origin,
        display_title,
        display_description,
        timestamp: date.unwrap_or(now_ms),
        has_date: date.is_some(),
        popularity,
        url,
        fields: raw.clone(),
    }
}

/// String form of a scalar field. Numbers count (HN `objectID` is a string,
/// but other ids may not be).
fn scalar_str(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(raw: &RawItem, fields: &[&str], clean: fn(&str) -> String) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| raw.get(*f).and_then(scalar_str))
        .map(|s| clean(&s))
        .find(|s| !s.is_empty())
}

fn first_timestamp(raw: &RawItem, fields: &[&str]) -> Option<i64> {
    fields
        .iter()
        .filter_map(|f| raw.get(*f))
        .find_map(timestamp_of)
}

/// Dates: RFC 3339, naive ISO (taken as UTC), or numeric Unix seconds.
fn timestamp_of(v: &Value) -> Option<i64> {
    match v {
        Value::String(s) => parse_date_ms(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(|secs| secs.checked_mul(1_000)),
        _ => None,
    }
}

pub fn parse_date_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc().timestamp_millis())
}

/// Negative, fractional-negative and non-numeric values clamp to 0.
fn popularity_of(v: &Value) -> u64 {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn resolve_url(raw: &RawItem, sources: &[UrlSource]) -> Option<String> {
    sources.iter().find_map(|src| match src {
        UrlSource::Field(f) => raw
            .get(*f)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        UrlSource::Template(prefix, f) => raw
            .get(*f)
            .and_then(scalar_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| format!("{prefix}{s}")),
    })
}

/// Stable short key: first 12 hex chars of sha256(origin + key).
fn item_id(origin: Origin, key: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(origin.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Title cleanup: decode entities, collapse whitespace. Angle brackets are
/// kept (`Vec<T>` is a title, not markup).
pub fn plain_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));

    let decoded = html_escape::decode_html_entities(s);
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// Description cleanup: strip tags, then as [`plain_text`].
pub fn clean_text(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));

    plain_text(&re_tags.replace_all(s, " "))
}
