// tests/query_engine.rs
//
// Scope selection, filtering and sorting over hand-built snapshots.

use std::sync::Arc;

use feed_aggregator::query::{candidate_set, collate, query, resolve_view, View};
use feed_aggregator::{
    ActiveOrigin, NormalizedItem, Origin, OriginState, SortKey, SourcesSnapshot,
};
use rand::seq::SliceRandom;

fn item(origin: Origin, title: &str, desc: &str, ts: i64, pop: u64) -> NormalizedItem {
    NormalizedItem {
        id: format!("{origin}-{title}-{ts}"),
        origin,
        display_title: title.to_string(),
        display_description: desc.to_string(),
        timestamp: ts,
        has_date: true,
        popularity: pop,
        url: None,
        fields: Default::default(),
    }
}

fn ready(items: Vec<NormalizedItem>) -> OriginState {
    OriginState::Ready(Arc::new(items))
}

fn timestamps(out: &[feed_aggregator::DisplayRecord<'_>]) -> Vec<i64> {
    out.iter().map(|r| r.item.timestamp).collect()
}

#[test]
fn most_recent_orders_descending() {
    let snap = SourcesSnapshot::from_states([(
        Origin::News,
        ready(vec![
            item(Origin::News, "a", "", 100, 0),
            item(Origin::News, "b", "", 300, 0),
            item(Origin::News, "c", "", 200, 0),
        ]),
    )]);
    let out = query(&snap, "", ActiveOrigin::One(Origin::News), SortKey::Recent);
    assert_eq!(timestamps(&out), vec![300, 200, 100]);
}

#[test]
fn matches_title_or_description() {
    let snap = SourcesSnapshot::from_states([(
        Origin::Repository,
        ready(vec![item(Origin::Repository, "rust-lang", "compiler", 1, 1)]),
    )]);
    let scope = ActiveOrigin::One(Origin::Repository);
    assert_eq!(query(&snap, "rust", scope, SortKey::Recent).len(), 1);
    assert_eq!(query(&snap, "compiler", scope, SortKey::Recent).len(), 1);
    assert_eq!(query(&snap, "COMPILER", scope, SortKey::Recent).len(), 1);
    assert!(query(&snap, "xyz", scope, SortKey::Recent).is_empty());
}

#[test]
fn all_mode_skips_pending_origins() {
    let snap = SourcesSnapshot::from_states([
        (Origin::News, ready(vec![item(Origin::News, "hn", "", 5, 50)])),
        (Origin::Repository, OriginState::Pending),
    ]);
    let out = query(&snap, "", ActiveOrigin::All, SortKey::Popular);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].origin, Origin::News);
    assert_eq!(out[0].item.popularity, 50);
}

#[test]
fn all_mode_skips_failed_origins_and_keeps_union_order() {
    let snap = SourcesSnapshot::from_states([
        (Origin::Model, ready(vec![item(Origin::Model, "m", "", 1, 0)])),
        (Origin::Preprint, OriginState::Failed("boom".into())),
        (Origin::News, ready(vec![item(Origin::News, "n", "", 1, 0)])),
    ]);
    let cands = candidate_set(&snap, ActiveOrigin::All);
    let origins: Vec<Origin> = cands.iter().map(|i| i.origin).collect();
    assert_eq!(origins, vec![Origin::News, Origin::Model]);

    // Equal timestamps: stability keeps union order.
    let out = query(&snap, "", ActiveOrigin::All, SortKey::Recent);
    assert_eq!(out[0].origin, Origin::News);
    assert_eq!(out[1].origin, Origin::Model);
}

#[test]
fn single_origin_scope_excludes_others() {
    let snap = SourcesSnapshot::from_states([
        (Origin::News, ready(vec![item(Origin::News, "shared term", "", 1, 0)])),
        (Origin::Model, ready(vec![item(Origin::Model, "shared term", "", 1, 0)])),
    ]);
    let out = query(&snap, "shared", ActiveOrigin::One(Origin::Model), SortKey::Recent);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].origin, Origin::Model);
}

#[test]
fn resolve_view_reports_lifecycle_for_single_origin() {
    let snap = SourcesSnapshot::from_states([
        (Origin::News, ready(vec![item(Origin::News, "x", "", 1, 0)])),
        (Origin::Preprint, OriginState::Failed("HTTP 503".into())),
    ]);
    assert_eq!(
        resolve_view(&snap, "", ActiveOrigin::One(Origin::Preprint), SortKey::Recent),
        View::Failed {
            origin: Origin::Preprint,
            message: "HTTP 503".into()
        }
    );
    assert_eq!(
        resolve_view(&snap, "", ActiveOrigin::One(Origin::Repository), SortKey::Recent),
        View::Loading {
            origin: Origin::Repository
        }
    );
    match resolve_view(&snap, "", ActiveOrigin::All, SortKey::Recent) {
        View::Results(r) => assert_eq!(r.len(), 1),
        other => panic!("expected results, got {other:?}"),
    }
    // A ready origin with nothing matching is an empty result, not an error.
    assert_eq!(
        resolve_view(&snap, "nope", ActiveOrigin::One(Origin::News), SortKey::Recent),
        View::Results(vec![])
    );
}

fn mixed_snapshot() -> SourcesSnapshot {
    let titles = [
        "Zebra", "apple", "Éclair", "eagle", "ezra", "Apple", "banana", "Ødegaard", "ode",
        "rust", "Rust", "résumé", "resume",
    ];
    let mut news = Vec::new();
    let mut models = Vec::new();
    for (i, t) in titles.iter().enumerate() {
        let it = item(
            if i % 2 == 0 { Origin::News } else { Origin::Model },
            t,
            if i % 3 == 0 { "physics notes" } else { "" },
            (i as i64 % 4) * 1_000,
            (i as u64 * 7) % 5,
        );
        if i % 2 == 0 {
            news.push(it);
        } else {
            models.push(it);
        }
    }
    SourcesSnapshot::from_states([(Origin::News, ready(news)), (Origin::Model, ready(models))])
}

#[test]
fn filtering_is_a_subset_and_empty_term_is_identity() {
    let snap = mixed_snapshot();
    let cands = candidate_set(&snap, ActiveOrigin::All);
    for term in ["", "e", "PHYSICS", "zz", "rust"] {
        let out = query(&snap, term, ActiveOrigin::All, SortKey::Title);
        assert!(out
            .iter()
            .all(|r| cands.iter().any(|c| std::ptr::eq(*c, r.item))));
    }
    let all = query(&snap, "", ActiveOrigin::All, SortKey::Recent);
    assert_eq!(all.len(), cands.len());
}

#[test]
fn sort_orders_are_monotone() {
    let snap = mixed_snapshot();

    let recent = query(&snap, "", ActiveOrigin::All, SortKey::Recent);
    assert!(recent.windows(2).all(|w| w[0].item.timestamp >= w[1].item.timestamp));

    let popular = query(&snap, "", ActiveOrigin::All, SortKey::Popular);
    assert!(popular.windows(2).all(|w| w[0].item.popularity >= w[1].item.popularity));

    let titled = query(&snap, "", ActiveOrigin::All, SortKey::Title);
    assert!(titled
        .windows(2)
        .all(|w| collate(&w[0].item.display_title, &w[1].item.display_title).is_le()));
    let names: Vec<&str> = titled.iter().map(|r| r.item.display_title.as_str()).collect();
    let pos = |t: &str| names.iter().position(|n| *n == t).unwrap();
    assert!(pos("eagle") < pos("Éclair") && pos("Éclair") < pos("ezra"));
    assert!(pos("apple") < pos("Apple"));
    assert!(pos("ode") < pos("Ødegaard") && pos("Ødegaard") < pos("Zebra"));
}

#[test]
fn title_sort_places_stroked_letters_with_their_base() {
    let titles = ["zebra", "Łódź", "Ødegaard", "apple", "mango"];
    let snap = SourcesSnapshot::from_states([(
        Origin::Model,
        ready(titles.iter().map(|t| item(Origin::Model, t, "", 1, 0)).collect()),
    )]);
    let out = query(&snap, "", ActiveOrigin::All, SortKey::Title);
    let names: Vec<&str> = out.iter().map(|r| r.item.display_title.as_str()).collect();
    assert_eq!(names, vec!["apple", "Łódź", "mango", "Ødegaard", "zebra"]);
}

#[test]
fn sorting_is_stable_under_shuffles() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        // Many equal keys; ids record input position.
        let mut items: Vec<NormalizedItem> = (0..30)
            .map(|i| {
                let title = if i % 2 == 0 { "same" } else { "Same" };
                item(Origin::News, title, "", (i % 3) * 10, (i % 4) as u64)
            })
            .collect();
        items.shuffle(&mut rng);
        for (pos, it) in items.iter_mut().enumerate() {
            it.id = pos.to_string();
        }
        let snap = SourcesSnapshot::from_states([(Origin::News, ready(items))]);

        for sort in [SortKey::Recent, SortKey::Popular, SortKey::Title] {
            let out = query(&snap, "", ActiveOrigin::All, sort);
            for w in out.windows(2) {
                let (a, b) = (w[0].item, w[1].item);
                let tied = match sort {
                    SortKey::Recent => a.timestamp == b.timestamp,
                    SortKey::Popular => a.popularity == b.popularity,
                    SortKey::Title => a.display_title == b.display_title,
                };
                if tied {
                    let (pa, pb): (usize, usize) = (a.id.parse().unwrap(), b.id.parse().unwrap());
                    assert!(pa < pb, "{sort:?} broke input order");
                }
            }
        }
    }
}
