//! Per-origin lifecycle state shared between ingest and queries.
//!
//! Each origin is `Pending`, `Ready(items)` or `Failed(message)`. Fetches are
//! numbered with tickets; only the latest ticket for an origin may write its
//! result, so a slow older fetch can never overwrite a newer one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::normalize::NormalizedItem;
use crate::origin::Origin;

#[derive(Debug, Clone, PartialEq)]
pub enum OriginState {
    Pending,
    Ready(Arc<Vec<NormalizedItem>>),
    Failed(String),
}

impl OriginState {
    pub fn label(&self) -> &'static str {
        match self {
            OriginState::Pending => "pending",
            OriginState::Ready(_) => "ready",
            OriginState::Failed(_) => "failed",
        }
    }

    pub fn items(&self) -> Option<&[NormalizedItem]> {
        match self {
            OriginState::Ready(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Identifies one fetch of one origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub origin: Origin,
    seq: u64,
}

#[derive(Debug)]
struct Slot {
    state: OriginState,
    latest: u64,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            state: OriginState::Pending,
            latest: 0,
        }
    }
}

/// Consistent, immutable copy of every origin's state.
#[derive(Debug, Clone, Default)]
pub struct SourcesSnapshot {
    states: HashMap<Origin, OriginState>,
}

impl SourcesSnapshot {
    /// Origins never fetched read as `Pending`.
    pub fn state(&self, origin: Origin) -> &OriginState {
        static PENDING: OriginState = OriginState::Pending;
        self.states.get(&origin).unwrap_or(&PENDING)
    }

    pub fn ready_items(&self, origin: Origin) -> Option<&[NormalizedItem]> {
        self.state(origin).items()
    }

    /// Build a snapshot directly (tests, offline tools).
    pub fn from_states(states: impl IntoIterator<Item = (Origin, OriginState)>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }

    pub fn status(&self) -> Vec<OriginStatus> {
        Origin::ALL
            .iter()
            .map(|&origin| {
                let st = self.state(origin);
                OriginStatus {
                    origin,
                    status: st.label(),
                    count: st.items().map(<[_]>::len).unwrap_or(0),
                    error: match st {
                        OriginState::Failed(m) => Some(m.clone()),
                        _ => None,
                    },
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OriginStatus {
    pub origin: Origin,
    pub status: &'static str,
    pub count: usize,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct OriginStore {
    inner: RwLock<HashMap<Origin, Slot>>,
    seq: AtomicU64,
}

impl OriginStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Origin, Slot>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Origin, Slot>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new fetch for `origin`. Ready data stays visible until the
    /// new result lands; pending or failed origins go (back) to pending.
    pub fn begin_fetch(&self, origin: Origin) -> FetchTicket {
        let mut map = self.write();
        // Allocated under the write lock: ticket order equals `latest` order.
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let slot = map.entry(origin).or_default();
        slot.latest = seq;
        if !matches!(slot.state, OriginState::Ready(_)) {
            slot.state = OriginState::Pending;
        }
        FetchTicket { origin, seq }
    }

    /// Apply a finished fetch. Returns `false` (and changes nothing) when a
    /// newer fetch for the same origin has been started since.
    pub fn complete(
        &self,
        ticket: FetchTicket,
        result: Result<Vec<NormalizedItem>, String>,
    ) -> bool {
        let mut map = self.write();
        let slot = map.entry(ticket.origin).or_default();
        if slot.latest != ticket.seq {
            return false;
        }
        slot.state = match result {
            Ok(items) => OriginState::Ready(Arc::new(items)),
            Err(msg) => OriginState::Failed(msg),
        };
        true
    }

    pub fn state(&self, origin: Origin) -> OriginState {
        self.read()
            .get(&origin)
            .map(|s| s.state.clone())
            .unwrap_or(OriginState::Pending)
    }

    pub fn snapshot(&self) -> SourcesSnapshot {
        let map = self.read();
        SourcesSnapshot {
            states: map.iter().map(|(o, s)| (*o, s.state.clone())).collect(),
        }
    }
}
