//! In-memory session records.
//!
//! Each session holds the JSON of the last document generated in it, so a later export can pick
//! it up. Nothing is persisted. The store is bounded: once it holds `capacity` sessions, storing
//! a new one evicts the session that was created first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use opord_core::constants::SESSION_CAPACITY;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Sessions {
    documents: HashMap<Uuid, String>,
    /// Session ids, oldest first.
    order: VecDeque<Uuid>,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_capacity(SESSION_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    /// The session named by `id`, or a fresh one when `id` is absent or not a UUID.
    pub fn resolve(id: Option<&str>) -> Uuid {
        id.and_then(|s| Uuid::parse_str(s.trim()).ok())
            .unwrap_or_else(Uuid::new_v4)
    }

    /// Replace the session's document, evicting the oldest session when a new one would exceed
    /// capacity.
    pub fn store(&self, id: Uuid, document_json: String) {
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if sessions.documents.insert(id, document_json).is_some() {
            return;
        }
        sessions.order.push_back(id);
        while sessions.order.len() > self.capacity {
            if let Some(oldest) = sessions.order.pop_front() {
                sessions.documents.remove(&oldest);
                tracing::debug!(session = %oldest, "evicted session");
            }
        }
    }

    pub fn load(&self, id: &Uuid) -> Option<String> {
        let sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        sessions.documents.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        let sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        sessions.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
