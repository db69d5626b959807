use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::card::Card;
use crate::ingest::Ingestor;
use crate::origin::{ActiveOrigin, Origin, SortKey};
use crate::query::{resolve_view, View};
use crate::store::OriginStatus;

#[derive(Clone)]
pub struct AppState {
    pub ingestor: Ingestor,
}

impl AppState {
    pub fn new(ingestor: Ingestor) -> Self {
        Self { ingestor }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/items", get(items))
        .route("/api/sources", get(sources))
        .route("/api/refresh", post(refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ItemsQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ItemsResp {
    Ready {
        source: String,
        count: usize,
        items: Vec<Card>,
    },
    Loading {
        origin: Origin,
    },
    Error {
        origin: Origin,
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct ErrorResp {
    error: String,
}

fn bad_request(msg: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResp {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn parse_active(raw: Option<&str>) -> Result<ActiveOrigin, Response> {
    raw.unwrap_or("all").parse::<ActiveOrigin>().map_err(bad_request)
}

async fn items(State(state): State<AppState>, Query(q): Query<ItemsQuery>) -> Response {
    let active = match parse_active(q.source.as_deref()) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let sort = match q.sort.as_deref().unwrap_or("recent").parse::<SortKey>() {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };

    let snapshot = state.ingestor.store().snapshot();
    let body = match resolve_view(&snapshot, &q.q, active, sort) {
        View::Loading { origin } => ItemsResp::Loading { origin },
        View::Failed { origin, message } => ItemsResp::Error { origin, message },
        View::Results(records) => {
            let items: Vec<Card> = records.iter().map(Card::from_record).collect();
            ItemsResp::Ready {
                source: active.to_string(),
                count: items.len(),
                items,
            }
        }
    };
    Json(body).into_response()
}

async fn sources(State(state): State<AppState>) -> Json<Vec<OriginStatus>> {
    Json(state.ingestor.store().snapshot().status())
}

#[derive(Debug, Default, Deserialize)]
struct RefreshQuery {
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshResp {
    scheduled: Vec<Origin>,
}

/// Fire-and-forget: fetches run in the background and land in the store.
async fn refresh(State(state): State<AppState>, Query(q): Query<RefreshQuery>) -> Response {
    let active = match parse_active(q.source.as_deref()) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let scheduled: Vec<Origin> = state
        .ingestor
        .spawn_refresh(active)
        .into_iter()
        .map(|(origin, _handle)| origin)
        .collect();
    tracing::info!(target: "api", source = %active, n = scheduled.len(), "refresh requested");
    (StatusCode::ACCEPTED, Json(RefreshResp { scheduled })).into_response()
}
