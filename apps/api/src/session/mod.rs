//! Per-session interview state.
//!
//! One `SessionState` exists per interviewer session: created on first
//! contact, mutated by every interaction, dropped when the session ends.
//! Interactions on one session run strictly one at a time: the store hands
//! out a per-session lock that handlers hold for the whole interaction,
//! including any chat API call.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::assistant::prompts::WELCOME_MESSAGE;
use crate::assistant::{AssistantClient, ChatMessage};
use crate::catalog::Level;

pub mod handlers;

/// Mutable state of one interviewer session.
#[derive(Debug)]
pub struct SessionState {
    pub id: Uuid,
    /// Chat credential for this session only. Never persisted, never part of
    /// a snapshot.
    api_key: Option<String>,
    pub position: Option<String>,
    pub level: Level,
    /// Text extracted from the uploaded résumé; empty until an upload.
    pub resume_text: String,
    pub messages: Vec<ChatMessage>,
    /// Single-slot queue for the hidden system prompt. At most one pending;
    /// consumed by exactly one assistant turn.
    pending_prompt: Option<String>,
    pub assistant_expanded: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    fn new(api_key: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            api_key,
            position: None,
            level: Level::Level1,
            resume_text: String::new(),
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            pending_prompt: None,
            assistant_expanded: false,
            created_at: Utc::now(),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Queues the hidden system prompt, replacing any previous one so the
    /// at-most-one-pending invariant holds.
    pub fn queue_hidden_prompt(&mut self, prompt: String) {
        self.pending_prompt = Some(prompt);
    }

    pub fn has_pending_prompt(&self) -> bool {
        self.pending_prompt.is_some()
    }

    /// Runs one assistant turn: consumes the pending hidden prompt, if any,
    /// and appends exactly one assistant reply to the log.
    pub async fn run_assistant_turn(&mut self, assistant: &AssistantClient) -> String {
        let hidden_prompt = self.pending_prompt.take();
        let reply = assistant
            .respond(&self.messages, self.api_key(), hidden_prompt.as_deref())
            .await;
        self.messages.push(ChatMessage::assistant(reply.clone()));
        reply
    }

    /// Read-only view rendered back to the client.
    pub fn snapshot(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            position: self.position.clone(),
            level: self.level,
            resume_text: self.resume_text.clone(),
            messages: self.messages.clone(),
            assistant_expanded: self.assistant_expanded,
            created_at: self.created_at,
        }
    }
}

/// What a render cycle sees. Excludes the credential and the hidden prompt
/// slot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub position: Option<String>,
    pub level: Level,
    pub resume_text: String,
    pub messages: Vec<ChatMessage>,
    pub assistant_expanded: bool,
    pub created_at: DateTime<Utc>,
}

/// In-memory session registry.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionState>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, api_key: Option<String>) -> Arc<Mutex<SessionState>> {
        let session = SessionState::new(api_key);
        let id = session.id;
        let session = Arc::new(Mutex::new(session));
        self.inner.write().await.insert(id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<SessionState>>> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}
