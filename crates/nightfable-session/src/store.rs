//! Session storage.
//!
//! Sessions live only in process memory. Every mutation runs inside
//! [`SessionRepository::update`] so check-and-set of the loading flag is
//! atomic per session.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use nightfable_core::error::DomainError;
use uuid::Uuid;

use crate::domain::aggregates::StorySession;

/// Repository abstraction for story sessions.
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store is unusable.
    fn insert(&self, session: StorySession) -> Result<(), DomainError>;

    /// Returns a snapshot of the session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown ID.
    fn load(&self, session_id: Uuid) -> Result<StorySession, DomainError>;

    /// Runs `mutation` against the stored session while holding exclusive
    /// access to it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown ID, or whatever
    /// `mutation` returns.
    fn update(
        &self,
        session_id: Uuid,
        mutation: &mut dyn FnMut(&mut StorySession) -> Result<(), DomainError>,
    ) -> Result<StorySession, DomainError>;
}

/// `SessionRepository` backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<Uuid, StorySession>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, StorySession>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session store poisoned: {e}")))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: StorySession) -> Result<(), DomainError> {
        self.lock()?.insert(session.id, session);
        Ok(())
    }

    fn load(&self, session_id: Uuid) -> Result<StorySession, DomainError> {
        self.lock()?
            .get(&session_id)
            .cloned()
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    fn update(
        &self,
        session_id: Uuid,
        mutation: &mut dyn FnMut(&mut StorySession) -> Result<(), DomainError>,
    ) -> Result<StorySession, DomainError> {
        let mut sessions = self.lock()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(DomainError::SessionNotFound(session_id))?;
        mutation(session)?;
        Ok(session.clone())
    }
}
