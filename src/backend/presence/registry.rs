/**
 * Presence Registry
 *
 * Tracks the live collaborators of one session. The registry is owned by
 * the session actor and mutated only through its methods on the actor's
 * serialized command loop, which is what makes join/leave linearizable:
 * no two connections can ever observe the same userId present twice.
 *
 * A reconnect replaces the existing entry in place, so list order remains
 * stable by original join time.
 */
use crate::shared::collaborator::{Collaborator, PresenceStatus, Role};
use crate::shared::error::{CollabError, CollabResult};

/// Live collaborator registry for a single session
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    // Join-ordered; at most one entry per user_id.
    collaborators: Vec<Collaborator>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert for a joining or reconnecting collaborator
    ///
    /// If the user is already present the existing entry is replaced in
    /// place (keeping its join-order position) and marked online; otherwise
    /// a new entry is appended. Returns the resulting collaborator and the
    /// new active count.
    pub fn join(
        &mut self,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        role: Role,
    ) -> (Collaborator, usize) {
        let entry = Collaborator::new(user_id, user_name, role);
        match self
            .collaborators
            .iter()
            .position(|c| c.user_id == entry.user_id)
        {
            Some(index) => self.collaborators[index] = entry.clone(),
            None => self.collaborators.push(entry.clone()),
        }
        (entry, self.collaborators.len())
    }

    /// Remove a collaborator; no-op if absent
    ///
    /// Returns whether an entry was removed and the remaining count.
    pub fn leave(&mut self, user_id: &str) -> (bool, usize) {
        let before = self.collaborators.len();
        self.collaborators.retain(|c| c.user_id != user_id);
        let removed = self.collaborators.len() < before;
        (removed, self.collaborators.len())
    }

    /// Update a collaborator's status; unknown userId is an error
    pub fn set_status(&mut self, user_id: &str, status: PresenceStatus) -> CollabResult<Collaborator> {
        match self.collaborators.iter_mut().find(|c| c.user_id == user_id) {
            Some(collaborator) => {
                collaborator.status = status;
                collaborator.touch();
                Ok(collaborator.clone())
            }
            None => Err(CollabError::not_found("collaborator", user_id)),
        }
    }

    /// Refresh a collaborator's activity timestamp, if present
    pub fn touch(&mut self, user_id: &str) {
        if let Some(collaborator) = self.collaborators.iter_mut().find(|c| c.user_id == user_id) {
            collaborator.touch();
        }
    }

    /// Look up a collaborator by user id
    pub fn get(&self, user_id: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.user_id == user_id)
    }

    /// Snapshot of all collaborators, stable ordering by join time
    pub fn list(&self) -> Vec<Collaborator> {
        self.collaborators.clone()
    }

    pub fn len(&self) -> usize {
        self.collaborators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collaborators.is_empty()
    }
}
