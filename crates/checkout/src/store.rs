use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use shared::{domain::CheckoutId, error::ApiError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::{pricing::ResolvedOrder, session::CheckoutSession};

struct Entry {
    session: Arc<Mutex<CheckoutSession>>,
    last_seen: DateTime<Utc>,
}

/// Live checkout sessions, held in memory only. Sessions idle for longer
/// than the TTL are dropped the next time a session is opened, and the
/// store never holds more than `max_sessions` at once.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<CheckoutId, Entry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn open(&self, order: ResolvedOrder) -> CheckoutId {
        self.open_at(order, Utc::now()).await
    }

    pub async fn open_at(&self, order: ResolvedOrder, now: DateTime<Utc>) -> CheckoutId {
        let id = CheckoutId::new_v4();
        let mut entries = self.entries.write().await;
        prune(&mut entries, now, self.idle_ttl);
        while entries.len() >= self.max_sessions {
            let Some(oldest) = least_recently_seen(&entries) else {
                break;
            };
            entries.remove(&oldest);
            warn!(
                checkout_id = %oldest,
                max = self.max_sessions,
                "session limit reached; evicted"
            );
        }
        entries.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(CheckoutSession::new(id, order, now))),
                last_seen: now,
            },
        );
        id
    }

    pub async fn get(&self, id: CheckoutId) -> Result<Arc<Mutex<CheckoutSession>>, ApiError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("checkout {id} not found")))?;
        entry.last_seen = Utc::now();
        Ok(Arc::clone(&entry.session))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn prune(entries: &mut HashMap<CheckoutId, Entry>, now: DateTime<Utc>, ttl: Duration) {
    let before = entries.len();
    entries.retain(|_, entry| now - entry.last_seen <= ttl);
    let removed = before - entries.len();
    if removed > 0 {
        debug!(removed, "pruned idle checkout sessions");
    }
}

fn least_recently_seen(entries: &HashMap<CheckoutId, Entry>) -> Option<CheckoutId> {
    entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_seen)
        .map(|(id, _)| *id)
}
