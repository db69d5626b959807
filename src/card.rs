// src/card.rs
//! Card records: what a client renders for one display record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::origin::Origin;
use crate::query::DisplayRecord;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub origin: Origin,
    pub title: String,
    pub description: String,
    pub stats: Option<String>,
    pub date_label: String,
    pub timestamp: i64,
    pub popularity: u64,
    pub url: Option<String>,
    pub link_label: &'static str,
}

impl Card {
    pub fn from_record(rec: &DisplayRecord<'_>) -> Self {
        let item = rec.item;
        let map = rec.origin.field_map();
        let labels = &map.labels;

        let description = match labels.empty_description {
            Some(placeholder) if item.display_description.is_empty() => placeholder.to_string(),
            _ => item.display_description.clone(),
        };

        let stats = labels.stats_prefix.map(|prefix| {
            let present = map
                .popularity
                .and_then(|f| item.fields.get(f))
                .is_some_and(|v| !v.is_null());
            match labels.missing_stats {
                Some(missing) if !present => format!("{prefix}{missing}"),
                _ => format!("{prefix}{}", thousands(item.popularity)),
            }
        });

        let date_label = item
            .has_date
            .then(|| format_date(item.timestamp))
            .flatten()
            .map(|d| format!("{}: {d}", labels.date_prefix))
            .unwrap_or_else(|| NO_DATE.to_string());

        Card {
            id: item.id.clone(),
            origin: rec.origin,
            title: item.display_title.clone(),
            description,
            stats,
            date_label,
            timestamp: item.timestamp,
            popularity: item.popularity,
            url: item.url.clone(),
            link_label: labels.link_label,
        }
    }
}

const NO_DATE: &str = "No date available";

/// `Jan 5, 2024, 03:04 PM` (UTC). `None` outside chrono's range.
pub fn format_date(ts_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%b %-d, %Y, %I:%M %p").to_string())
}

/// 1234567 -> "1,234,567"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
