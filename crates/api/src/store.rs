//! In-memory session store.
//!
//! Sessions are process-local and keyed by the caller's session id plus
//! the flow, so a visitor can carry a tarot and an astrology wizard at
//! once without them colliding. Loading an unknown key yields a fresh
//! session parked on the welcome step.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use arcana_core::session::{ReadingKind, ReadingSession};

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<(Uuid, ReadingKind), ReadingSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The caller's session for a flow, or a fresh one.
    pub async fn load(&self, id: Uuid, kind: ReadingKind) -> ReadingSession {
        self.inner
            .read()
            .await
            .get(&(id, kind))
            .cloned()
            .unwrap_or_else(|| ReadingSession::new(kind))
    }

    pub async fn save(&self, id: Uuid, kind: ReadingKind, session: ReadingSession) {
        self.inner.write().await.insert((id, kind), session);
    }
}
