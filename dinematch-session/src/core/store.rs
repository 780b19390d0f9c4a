use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dinematch_common::{
    env::{
        place::{Parameters, Place},
        session::{Session, SessionSnapshot},
    },
    error::{DineError, Result},
};
use tracing::{debug, info, warn};

/// Every live session, keyed by its caller-supplied identifier.
///
/// One lock guards the whole map: mutations take it exclusively, snapshots
/// share it. Callers never hold references into the map, so every operation
/// resolves the identifier again under the lock. A session replaced by a
/// duplicate `create_session` can therefore not be mutated afterwards.
///
/// Sessions are never removed and live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Installs a new session under `id` with no members and no votes.
    /// Replaces whatever session was stored under the same identifier.
    pub fn create_session(&self, id: &str, parameters: Parameters, places: Vec<Place>) {
        let candidates = places.len();
        let mut sessions = self.write();
        let replaced = sessions
            .insert(id.to_string(), Session::new(parameters, places))
            .is_some();
        drop(sessions);

        if replaced {
            warn!("Session [{}] already existed and was replaced", id);
        }
        info!(target: "consensus", "EVENT:CREATE_SESSION session_id={} candidates={} distance={} price={} rating={}",
            id, candidates, parameters.distance, parameters.price, parameters.rating);
    }

    /// Appends `member_id` to the session's members.
    /// A member joining twice is counted twice.
    pub fn join(&self, id: &str, member_id: &str) -> Result<()> {
        let mut sessions = self.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| DineError::SessionNotFound(id.to_string()))?;

        session.members.push(member_id.to_string());
        let members = session.members.len();
        drop(sessions);

        info!(target: "consensus", "EVENT:JOIN session_id={} member={} members={}", id, member_id, members);
        Ok(())
    }

    /// Sets the like/dislike flag of `member_id` for `place_id`, replacing any
    /// earlier flag. Neither the place nor the member is checked against the
    /// session.
    pub fn record_vote(&self, id: &str, member_id: &str, place_id: &str, liked: bool) -> Result<()> {
        let mut sessions = self.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| DineError::SessionNotFound(id.to_string()))?;

        let previous = session.votes.record(place_id, member_id, liked);
        drop(sessions);

        if let Some(previous) = previous {
            debug!("[{}] {} changed vote on {}: {} -> {}", id, member_id, place_id, previous, liked);
        }
        info!(target: "consensus", "EVENT:VOTE session_id={} member={} place_id={} liked={}", id, member_id, place_id, liked);
        Ok(())
    }

    /// Copies the session so it can be ranked without holding the lock.
    pub fn snapshot(&self, id: &str) -> Result<SessionSnapshot> {
        self.read()
            .get(id)
            .map(|session| session.snapshot(id))
            .ok_or_else(|| DineError::SessionNotFound(id.to_string()))
    }

    /// Candidate list of the session.
    pub fn places(&self, id: &str) -> Result<Vec<Place>> {
        self.read()
            .get(id)
            .map(|session| session.places.clone())
            .ok_or_else(|| DineError::SessionNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every operation leaves the map consistent before anything can panic,
    // so a poisoned lock still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
