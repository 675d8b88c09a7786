/**
 * Conflict Resolution Workflow
 *
 * State machine per conflict:
 *
 *   open --(resolve request)--> resolving --(AI success)--> resolved
 *                               resolving --(AI failure)--> open
 *
 * At most one resolution attempt may be in flight per conflict: a second
 * concurrent resolve for the same id is rejected with `AlreadyInFlight`,
 * not queued. A resolve on an already-resolved conflict returns the
 * resolved record unchanged, mirroring the suggestion idempotency contract.
 */
use std::collections::HashMap;

use chrono::Utc;

use crate::shared::conflict::{Conflict, ConflictStatus, Resolution};
use crate::shared::error::{CollabError, CollabResult};

/// Outcome of a begin-resolution call
#[derive(Debug, Clone)]
pub enum BeginResolution {
    /// The conflict moved to `resolving`; the AI call should be made
    Started(Conflict),
    /// The conflict was already resolved; no AI call is needed
    AlreadyResolved(Conflict),
}

/// Per-session conflict board
#[derive(Debug, Default)]
pub struct ConflictBoard {
    conflicts: HashMap<String, Conflict>,
    order: Vec<String>,
}

impl ConflictBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly reported conflict
    pub fn report(
        &mut self,
        description: impl Into<String>,
        originating_event: serde_json::Value,
    ) -> Conflict {
        let conflict = Conflict::new(description, originating_event);
        self.order.push(conflict.id.clone());
        self.conflicts.insert(conflict.id.clone(), conflict.clone());
        conflict
    }

    /// Guard a resolution attempt for the given conflict
    ///
    /// Moves an `open` conflict to `resolving`. A `resolving` conflict
    /// rejects the attempt; a `resolved` one short-circuits to success.
    pub fn begin_resolution(&mut self, conflict_id: &str) -> CollabResult<BeginResolution> {
        let conflict = self
            .conflicts
            .get_mut(conflict_id)
            .ok_or_else(|| CollabError::not_found("conflict", conflict_id))?;

        match conflict.status {
            ConflictStatus::Resolving => Err(CollabError::already_in_flight(conflict_id)),
            ConflictStatus::Resolved => Ok(BeginResolution::AlreadyResolved(conflict.clone())),
            ConflictStatus::Open => {
                conflict.status = ConflictStatus::Resolving;
                Ok(BeginResolution::Started(conflict.clone()))
            }
        }
    }

    /// Commit a successful resolution atomically
    pub fn complete_resolution(
        &mut self,
        conflict_id: &str,
        text: impl Into<String>,
        data: serde_json::Value,
    ) -> CollabResult<Conflict> {
        let conflict = self
            .conflicts
            .get_mut(conflict_id)
            .ok_or_else(|| CollabError::not_found("conflict", conflict_id))?;

        conflict.status = ConflictStatus::Resolved;
        conflict.resolution = Some(Resolution {
            text: text.into(),
            data,
            resolved_at: Utc::now(),
        });
        Ok(conflict.clone())
    }

    /// Revert a failed resolution attempt to `open`, eligible for retry
    pub fn fail_resolution(&mut self, conflict_id: &str) -> CollabResult<Conflict> {
        let conflict = self
            .conflicts
            .get_mut(conflict_id)
            .ok_or_else(|| CollabError::not_found("conflict", conflict_id))?;

        if conflict.status == ConflictStatus::Resolving {
            conflict.status = ConflictStatus::Open;
        }
        Ok(conflict.clone())
    }

    pub fn get(&self, conflict_id: &str) -> Option<&Conflict> {
        self.conflicts.get(conflict_id)
    }

    /// Snapshot, optionally filtered by status, in report order
    pub fn list(&self, status: Option<ConflictStatus>) -> Vec<Conflict> {
        self.order
            .iter()
            .filter_map(|id| self.conflicts.get(id))
            .filter(|c| status.map(|s| c.status == s).unwrap_or(true))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
