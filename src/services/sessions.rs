use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::entities::{PromptStrategy, TranscriptEntry};

/// In-memory chat transcripts keyed by caller-chosen session id.
///
/// Each session only ever sees its own entries. Transcripts are bounded to
/// `max_turns`; the oldest entries are dropped first. At most `max_sessions`
/// sessions are held; opening one more evicts the least recently written.
pub struct TranscriptStore {
    sessions: DashMap<String, Session>,
    max_turns: usize,
    max_sessions: usize,
    clock: AtomicU64,
}

struct Session {
    entries: VecDeque<TranscriptEntry>,
    last_written: u64,
}

impl TranscriptStore {
    pub fn new(max_turns: usize, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns: max_turns.max(1),
            max_sessions: max_sessions.max(1),
            clock: AtomicU64::new(0),
        }
    }

    /// Append a turn and return the updated transcript.
    pub fn append(
        &self,
        session_id: &str,
        query: &str,
        answer: &str,
        technique: Option<PromptStrategy>,
    ) -> Vec<TranscriptEntry> {
        if !self.sessions.contains_key(session_id) {
            self.make_room();
        }

        let tick = self.clock.fetch_add(1, Ordering::Relaxed);
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                entries: VecDeque::new(),
                last_written: tick,
            });
        session.last_written = tick;
        session.entries.push_back(TranscriptEntry {
            id: Uuid::new_v4(),
            query: query.to_string(),
            answer: answer.to_string(),
            technique,
            created_at: Utc::now().naive_utc(),
        });
        while session.entries.len() > self.max_turns {
            session.entries.pop_front();
        }
        session.entries.iter().cloned().collect()
    }

    pub fn get(&self, session_id: &str) -> Vec<TranscriptEntry> {
        self.sessions
            .get(session_id)
            .map(|session| session.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forget a session. Returns how many entries it held.
    pub fn clear(&self, session_id: &str) -> usize {
        self.sessions
            .remove(session_id)
            .map(|(_, session)| session.entries.len())
            .unwrap_or(0)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // Must not be called while holding a reference into `sessions`.
    fn make_room(&self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|session| session.last_written)
                .map(|session| session.key().clone());
            let Some(session_id) = oldest else { break };
            self.sessions.remove(&session_id);
            tracing::debug!(session_id = %session_id, "Evicted least recently written session");
        }
    }
}
