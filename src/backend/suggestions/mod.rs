/**
 * Suggestion Lifecycle Store
 *
 * Holds a session's AI suggestions from creation through accept/reject.
 * Status transitions are one-way and idempotent: the first accept or
 * reject wins, and any later attempt returns the existing terminal record
 * unchanged. The store is bounded; inserting past the cap evicts the
 * oldest terminal suggestion (or the oldest overall when none is
 * terminal yet).
 */
use std::collections::HashMap;

use crate::shared::error::{CollabError, CollabResult};
use crate::shared::suggestion::{Suggestion, SuggestionStatus};

/// Result of an accept/reject call
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The suggestion after the call
    pub suggestion: Suggestion,
    /// Whether this call performed the pending -> terminal transition
    pub transitioned: bool,
}

/// Bounded per-session suggestion store
#[derive(Debug)]
pub struct SuggestionStore {
    suggestions: HashMap<String, Suggestion>,
    // Insertion order, for createdAt-stable listings and eviction.
    order: Vec<String>,
    cap: usize,
}

impl SuggestionStore {
    pub fn new(cap: usize) -> Self {
        Self {
            suggestions: HashMap::new(),
            order: Vec::new(),
            cap,
        }
    }

    /// Insert a freshly created suggestion, evicting past the cap
    pub fn insert(&mut self, suggestion: Suggestion) -> Suggestion {
        if self.order.len() >= self.cap {
            self.evict_one();
        }
        self.order.push(suggestion.id.clone());
        self.suggestions
            .insert(suggestion.id.clone(), suggestion.clone());
        suggestion
    }

    /// Accept a suggestion; idempotent once terminal
    pub fn accept(&mut self, suggestion_id: &str) -> CollabResult<TransitionOutcome> {
        self.transition(suggestion_id, SuggestionStatus::Accepted)
    }

    /// Reject a suggestion; idempotent once terminal
    pub fn reject(&mut self, suggestion_id: &str) -> CollabResult<TransitionOutcome> {
        self.transition(suggestion_id, SuggestionStatus::Rejected)
    }

    /// Pending suggestions ordered by creation, oldest first
    pub fn list_pending(&self) -> Vec<Suggestion> {
        self.order
            .iter()
            .filter_map(|id| self.suggestions.get(id))
            .filter(|s| s.is_pending())
            .cloned()
            .collect()
    }

    pub fn get(&self, suggestion_id: &str) -> Option<&Suggestion> {
        self.suggestions.get(suggestion_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn transition(
        &mut self,
        suggestion_id: &str,
        target: SuggestionStatus,
    ) -> CollabResult<TransitionOutcome> {
        let suggestion = self
            .suggestions
            .get_mut(suggestion_id)
            .ok_or_else(|| CollabError::not_found("suggestion", suggestion_id))?;

        if suggestion.status.is_terminal() {
            // Terminal statuses are never overwritten; report the call as
            // successful with the original record.
            return Ok(TransitionOutcome {
                suggestion: suggestion.clone(),
                transitioned: false,
            });
        }

        suggestion.status = target;
        Ok(TransitionOutcome {
            suggestion: suggestion.clone(),
            transitioned: true,
        })
    }

    fn evict_one(&mut self) {
        let victim = self
            .order
            .iter()
            .position(|id| {
                self.suggestions
                    .get(id)
                    .map(|s| s.status.is_terminal())
                    .unwrap_or(true)
            })
            // All pending: the cap is still a hard bound, so the oldest goes.
            .unwrap_or(0);

        if victim < self.order.len() {
            let id = self.order.remove(victim);
            self.suggestions.remove(&id);
            tracing::debug!("[Suggestions] Evicted suggestion {} at cap", id);
        }
    }
}
