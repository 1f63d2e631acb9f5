// Live session registry.
//
// Tracks activity per session id, entirely in memory: the registry rebuilds
// from nothing on restart and the segment files stay the source of truth.
// Each record keeps a ring of the most recent events so the status view can
// show what a session was doing without rereading the log.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::event::{AuditEvent, EventType};

/// How many recent events each session record retains.
pub const RECENT_EVENTS_PER_SESSION: usize = 10;

/// Default cap on tracked sessions before the least recently active one
/// is evicted.
pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

/// Compact view of one event, kept in a session's recent-events ring.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub action: String,
}

/// Everything tracked for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub session_id: String,
    /// User from the session's first event. Later events under the same
    /// session id do not change it.
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Total events seen, including ones no longer in the ring.
    pub event_count: u64,
    pub recent_events: VecDeque<EventSummary>,
}

/// In-memory registry of active sessions, bounded by capacity.
pub struct SessionRegistry {
    capacity: usize,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Fold one event into the registry.
    ///
    /// A new session id at capacity evicts the session with the oldest
    /// last_activity before inserting.
    pub fn touch(&self, event: &AuditEvent) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !sessions.contains_key(&event.session_id) && sessions.len() >= self.capacity {
            let stalest = sessions
                .values()
                .min_by_key(|record| record.last_activity)
                .map(|record| record.session_id.clone());
            if let Some(session_id) = stalest {
                sessions.remove(&session_id);
            }
        }

        let record = sessions
            .entry(event.session_id.clone())
            .or_insert_with(|| SessionRecord {
                session_id: event.session_id.clone(),
                user_id: event.user_id.clone(),
                start_time: event.timestamp,
                last_activity: event.timestamp,
                event_count: 0,
                recent_events: VecDeque::with_capacity(RECENT_EVENTS_PER_SESSION),
            });

        record.last_activity = event.timestamp;
        record.event_count += 1;
        if record.recent_events.len() >= RECENT_EVENTS_PER_SESSION {
            record.recent_events.pop_front();
        }
        record.recent_events.push_back(EventSummary {
            event_id: event.event_id,
            event_type: event.event_type,
            timestamp: event.timestamp,
            action: event.action.clone(),
        });
    }

    /// Snapshot of all tracked sessions, most recently active first.
    pub fn snapshot(&self) -> Vec<SessionRecord> {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<SessionRecord> = sessions.values().cloned().collect();
        records.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        records
    }

    /// Number of sessions currently tracked.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
