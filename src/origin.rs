//! # Origins
//!
//! The closed set of content sources the aggregator knows about, plus the
//! scope (`ActiveOrigin`) and ordering (`SortKey`) parameters a query takes.
//!
//! String forms are lowercase. The legacy page names (`hackernews`, `arxiv`,
//! `github`, `huggingface`) are accepted as aliases when parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four fixed content sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    News,
    Preprint,
    Repository,
    Model,
}

impl Origin {
    /// Fixed union order used in "all sources" mode.
    pub const ALL: [Origin; 4] = [
        Origin::News,
        Origin::Preprint,
        Origin::Repository,
        Origin::Model,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::News => "news",
            Origin::Preprint => "preprint",
            Origin::Repository => "repository",
            Origin::Model => "model",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source '{0}' (expected all, news, preprint, repository or model)")]
pub struct UnknownOrigin(pub String);

impl FromStr for Origin {
    type Err = UnknownOrigin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" | "hackernews" | "hn" => Ok(Origin::News),
            "preprint" | "arxiv" => Ok(Origin::Preprint),
            "repository" | "github" => Ok(Origin::Repository),
            "model" | "huggingface" | "hf" => Ok(Origin::Model),
            _ => Err(UnknownOrigin(s.to_string())),
        }
    }
}

/// Query scope: every loaded origin, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveOrigin {
    #[default]
    All,
    One(Origin),
}

impl ActiveOrigin {
    /// Origins this scope covers, in union order.
    pub fn origins(self) -> Vec<Origin> {
        match self {
            ActiveOrigin::All => Origin::ALL.to_vec(),
            ActiveOrigin::One(o) => vec![o],
        }
    }
}

impl fmt::Display for ActiveOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveOrigin::All => f.write_str("all"),
            ActiveOrigin::One(o) => o.fmt(f),
        }
    }
}

impl FromStr for ActiveOrigin {
    type Err = UnknownOrigin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            return Ok(ActiveOrigin::All);
        }
        t.parse().map(ActiveOrigin::One)
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Descending by timestamp.
    #[default]
    Recent,
    /// Descending by popularity.
    Popular,
    /// Ascending, locale-aware by title.
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected recent, popular or title)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recent" | "most-recent" | "date" => Ok(SortKey::Recent),
            "popular" | "most-popular" | "popularity" => Ok(SortKey::Popular),
            "title" | "alpha" => Ok(SortKey::Title),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}
