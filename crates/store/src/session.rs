//! Per-session snapshot ownership.
//!
//! One snapshot per session, replaced wholesale on re-upload. Sessions
//! never observe each other's reloads: a reader holds an `Arc` to the
//! immutable snapshot it queried, and a reload only swaps the
//! session's own pointer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use store_core::{MetricsSnapshot, RawTables, Result};

use crate::cache::SnapshotCache;

/// Session timeout (30 minutes of inactivity).
pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// A dashboard viewing session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Last upload or query time
    pub last_active_at: DateTime<Utc>,
    /// Number of uploads this session has made
    pub upload_count: u64,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            last_active_at: now,
            upload_count: 0,
        }
    }

    /// Checks if the session has timed out.
    pub fn is_timed_out(&self) -> bool {
        let timeout = Duration::minutes(SESSION_TIMEOUT_MINUTES);
        Utc::now() - self.last_active_at > timeout
    }

    fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

struct SessionEntry {
    session: Session,
    snapshot: Option<Arc<MetricsSnapshot>>,
}

/// Registry mapping sessions to their current snapshot.
///
/// Loads go through a shared content-keyed [`SnapshotCache`], so two
/// sessions uploading identical files share one immutable snapshot
/// value; each still owns its own pointer and replaces it
/// independently.
pub struct SessionStore {
    cache: SnapshotCache,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            cache: SnapshotCache::new(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session with no snapshot ("awaiting input").
    pub fn open(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        self.sessions.write().insert(
            id,
            SessionEntry {
                session,
                snapshot: None,
            },
        );
        debug!(session = %id, "session opened");
        id
    }

    /// Load an upload for a session, replacing its snapshot wholesale.
    ///
    /// An unknown (expired or never opened) session ID is revived as a
    /// fresh session owning the new snapshot. On failure the session's
    /// previous snapshot is left in place.
    pub fn load(&self, id: Uuid, raw: &RawTables) -> Result<Arc<MetricsSnapshot>> {
        let snapshot = self.cache.load(raw)?;

        let mut sessions = self.sessions.write();
        let entry = sessions.entry(id).or_insert_with(|| {
            info!(session = %id, "unknown session revived on upload");
            SessionEntry {
                session: Session::new(),
                snapshot: None,
            }
        });
        entry.session.touch();
        entry.session.upload_count += 1;
        entry.snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// The session's current snapshot; `None` means awaiting input.
    pub fn snapshot(&self, id: Uuid) -> Option<Arc<MetricsSnapshot>> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(&id)?;
        entry.session.touch();
        entry.snapshot.clone()
    }

    /// End a session and drop its snapshot pointer.
    pub fn end(&self, id: Uuid) {
        if self.sessions.write().remove(&id).is_some() {
            debug!(session = %id, "session ended");
        }
    }

    /// Remove timed-out sessions; returns how many were swept.
    pub fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.session.is_timed_out());
        let swept = before - sessions.len();
        if swept > 0 {
            info!(swept, "expired sessions removed");
        }
        swept
    }

    /// Number of live sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.read().len()
    }

    /// The shared snapshot cache, for explicit invalidation.
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
