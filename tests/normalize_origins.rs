// tests/normalize_origins.rs
//
// Field mapping per origin, fallbacks and invariants.

use std::sync::Arc;

use feed_aggregator::ingest::types::RawItem;
use feed_aggregator::{
    normalize, normalize_at, query, ActiveOrigin, Origin, OriginState, SortKey, SourcesSnapshot,
};
use serde_json::{json, Value};

const NOW: i64 = 1_700_000_000_000;

fn raw(v: Value) -> RawItem {
    v.as_object().cloned().expect("object literal")
}

#[test]
fn sparse_model_normalizes_with_fallbacks() {
    let it = normalize_at(&raw(json!({"modelId": "org/no-card"})), Origin::Model, NOW);
    assert_eq!(it.display_title, "org/no-card");
    assert_eq!(it.display_description, "");
    assert_eq!(it.popularity, 0);
    assert_eq!(it.timestamp, NOW);
    assert!(!it.has_date);
    assert_eq!(it.origin, Origin::Model);
}

#[test]
fn empty_records_normalize_for_every_origin() {
    for origin in Origin::ALL {
        let it = normalize_at(&RawItem::new(), origin, NOW);
        assert!(!it.display_title.is_empty(), "{origin}: empty title");
        assert_eq!(it.display_title, format!("(untitled {origin})"));
        assert_eq!(it.popularity, 0);
        assert_eq!(it.timestamp, NOW);
        assert_eq!(it.origin, origin);
    }
}

#[test]
fn nulls_and_wrong_types_fall_back() {
    let it = normalize_at(
        &raw(json!({
            "name": null,
            "full_name": "acme/widget",
            "description": null,
            "stargazers_count": -3,
            "created_at": "not a date"
        })),
        Origin::Repository,
        NOW,
    );
    assert_eq!(it.display_title, "acme/widget");
    assert_eq!(it.display_description, "");
    assert_eq!(it.popularity, 0);
    assert_eq!(it.timestamp, NOW);
}

#[test]
fn news_fields_map_to_canonical_shape() {
    let it = normalize_at(
        &raw(json!({
            "title": "Show HN: thing",
            "url": "https://example.com",
            "points": 321,
            "created_at": "2024-03-01T12:00:00.000Z",
            "objectID": "1"
        })),
        Origin::News,
        NOW,
    );
    assert_eq!(it.display_title, "Show HN: thing");
    assert_eq!(it.popularity, 321);
    assert_eq!(it.timestamp, 1_709_294_400_000);
    assert!(it.has_date);
    assert_eq!(it.url.as_deref(), Some("https://example.com"));
    // Passthrough stays untouched.
    assert_eq!(it.fields["points"], 321);
}

#[test]
fn preprint_popularity_is_always_zero() {
    let it = normalize_at(
        &raw(json!({
            "title": "Paper",
            "link": "http://arxiv.org/abs/1",
            "summary": "Abstract.",
            "published": "2024-02-27T09:00:00Z",
            "points": 999
        })),
        Origin::Preprint,
        NOW,
    );
    assert_eq!(it.popularity, 0);
    assert_eq!(it.display_description, "Abstract.");
}

#[test]
fn preprint_with_blank_title_uses_link() {
    let it = normalize_at(
        &raw(json!({"title": "  ", "link": "http://arxiv.org/abs/2", "published": ""})),
        Origin::Preprint,
        NOW,
    );
    assert_eq!(it.display_title, "http://arxiv.org/abs/2");
    assert!(!it.has_date);
}

#[test]
fn model_date_falls_back_to_created_at() {
    let it = normalize_at(
        &raw(json!({"id": "x/y", "createdAt": "2023-01-01T00:00:00.000Z"})),
        Origin::Model,
        NOW,
    );
    assert_eq!(it.display_title, "x/y");
    assert_eq!(it.timestamp, 1_672_531_200_000);
    assert_eq!(it.url.as_deref(), Some("https://huggingface.co/x/y"));
}

#[test]
fn wall_clock_fallback_is_recent() {
    let before = chrono::Utc::now().timestamp_millis();
    let it = normalize(&RawItem::new(), Origin::News);
    assert!(it.timestamp >= before);
}

#[test]
fn generic_syntax_in_titles_survives_and_is_searchable() {
    let it = normalize_at(
        &raw(json!({
            "title": "Why Vec<T> beats Option<u8>",
            "story_text": "<p>Short <i>answer</i>: it depends.</p>",
            "objectID": "7"
        })),
        Origin::News,
        NOW,
    );
    assert_eq!(it.display_title, "Why Vec<T> beats Option<u8>");
    assert_eq!(it.display_description, "Short answer : it depends.");

    let snap = SourcesSnapshot::from_states([(Origin::News, OriginState::Ready(Arc::new(vec![it])))]);
    assert_eq!(query(&snap, "vec<t>", ActiveOrigin::All, SortKey::Recent).len(), 1);
    assert_eq!(query(&snap, "Option<u8>", ActiveOrigin::All, SortKey::Recent).len(), 1);
}
