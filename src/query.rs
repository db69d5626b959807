//! # Query Engine
//!
//! Pure function of `(snapshot, search term, active origin, sort key)`:
//!
//! 1. scope: every ready origin in union order, or exactly one origin
//! 2. filter: case-insensitive substring match on title or description
//! 3. sort: stable, by recency, popularity or locale-aware title
//!
//! [`resolve_view`] sits in front of it and turns a pending or failed single
//! origin into a loading/error view instead of an empty result.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;

use crate::normalize::NormalizedItem;
use crate::origin::{ActiveOrigin, Origin, SortKey};
use crate::store::{OriginState, SourcesSnapshot};

/// One element of the ordered output, handed to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayRecord<'a> {
    pub item: &'a NormalizedItem,
    pub origin: Origin,
}

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Loading { origin: Origin },
    Failed { origin: Origin, message: String },
    Results(Vec<DisplayRecord<'a>>),
}

/// Items eligible for filtering under `active`. Pending and failed origins
/// contribute nothing.
pub fn candidate_set(snapshot: &SourcesSnapshot, active: ActiveOrigin) -> Vec<&NormalizedItem> {
    active
        .origins()
        .into_iter()
        .filter_map(|o| snapshot.ready_items(o))
        .flatten()
        .collect()
}

/// Substring match on title or description, ignoring case. Empty term keeps all.
pub fn matches(item: &NormalizedItem, term_lower: &str) -> bool {
    term_lower.is_empty()
        || item.display_title.to_lowercase().contains(term_lower)
        || item.display_description.to_lowercase().contains(term_lower)
}

pub fn query<'a>(
    snapshot: &'a SourcesSnapshot,
    search_term: &str,
    active: ActiveOrigin,
    sort: SortKey,
) -> Vec<DisplayRecord<'a>> {
    let term = search_term.to_lowercase();
    let mut out: Vec<&NormalizedItem> = candidate_set(snapshot, active)
        .into_iter()
        .filter(|it| matches(it, &term))
        .collect();
    sort_items(&mut out, sort);
    out.into_iter()
        .map(|item| DisplayRecord {
            item,
            origin: item.origin,
        })
        .collect()
}

/// Stable sort in place.
pub fn sort_items(items: &mut [&NormalizedItem], sort: SortKey) {
    match sort {
        SortKey::Recent => items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Popular => items.sort_by(|a, b| b.popularity.cmp(&a.popularity)),
        SortKey::Title => ROOT_COLLATOR.with(|c| {
            items.sort_by(|a, b| compare_with(c.as_ref(), &a.display_title, &b.display_title))
        }),
    }
}

/// Decide loading/error/results. Single-origin mode surfaces the origin's
/// lifecycle; "all" mode always shows the partial union.
pub fn resolve_view<'a>(
    snapshot: &'a SourcesSnapshot,
    search_term: &str,
    active: ActiveOrigin,
    sort: SortKey,
) -> View<'a> {
    if let ActiveOrigin::One(origin) = active {
        match snapshot.state(origin) {
            OriginState::Pending => return View::Loading { origin },
            OriginState::Failed(message) => {
                return View::Failed {
                    origin,
                    message: message.clone(),
                }
            }
            OriginState::Ready(_) => {}
        }
    }
    View::Results(query(snapshot, search_term, active, sort))
}

thread_local! {
    static ROOT_COLLATOR: Option<Collator> = root_collator();
}

/// Root-locale UCA collator at tertiary strength: base letters, then
/// accents, then case (lowercase first).
fn root_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!(error = %e, "root collator unavailable; titles sort by code point");
            None
        }
    }
}

fn compare_with(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(c) => c.compare(a, b),
        None => a.cmp(b),
    }
}

/// Locale-aware string comparison.
pub fn collate(a: &str, b: &str) -> Ordering {
    ROOT_COLLATOR.with(|c| compare_with(c.as_ref(), a, b))
}
