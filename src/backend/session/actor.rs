/**
 * Session Actor
 *
 * One task per live session, owning all of that session's mutable state.
 * Commands are handled strictly in arrival order; every broadcast a
 * handler performs therefore reaches all subscribers in submission order.
 *
 * AI collaborator calls are dispatched to detached tasks under the
 * configured timeout and re-enter the queue as `SuggestionsReady` /
 * `ResolutionReady`, so their effects stay ordered relative to everything
 * else that happened to the session in the meantime.
 *
 * Teardown: when presence drops to zero the actor arms an epoch-guarded
 * grace timer. If the session is still empty when it fires, the actor
 * stops and reports itself to the coordinator's reaper; any join in
 * between bumps the epoch and the stale timer is ignored.
 */
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::ai::{AiCollaborator, ResolutionRequest, SuggestionRequest};
use crate::backend::broadcast::SessionBroadcaster;
use crate::backend::chat::MessageLog;
use crate::backend::conflicts::{BeginResolution, ConflictBoard};
use crate::backend::presence::PresenceRegistry;
use crate::backend::suggestions::SuggestionStore;
use crate::shared::collaborator::Collaborator;
use crate::shared::config::CoordinatorConfig;
use crate::shared::error::{CollabError, CollabResult};
use crate::shared::event::SessionEvent;
use crate::shared::suggestion::Suggestion;

use super::command::{Connected, SessionCommand, SuggestionJob};
use super::handle::SessionHandle;

/// Whether the run loop keeps going after a command
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Stop,
}

pub(crate) struct SessionActor {
    session_id: String,
    config: CoordinatorConfig,
    ai: Arc<dyn AiCollaborator>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    /// Clone handed to detached tasks so completions re-enter the queue
    self_tx: mpsc::UnboundedSender<SessionCommand>,
    /// Tells the coordinator's reaper this session id stopped
    closed_tx: mpsc::UnboundedSender<String>,
    presence: PresenceRegistry,
    broadcaster: SessionBroadcaster,
    log: MessageLog,
    suggestions: SuggestionStore,
    conflicts: ConflictBoard,
    /// Bumped on every join and every timer arm; stale timers are ignored
    teardown_epoch: u64,
}

impl SessionActor {
    /// Spawn the actor task for a new session and return its handle
    pub(crate) fn spawn(
        session_id: String,
        config: CoordinatorConfig,
        ai: Arc<dyn AiCollaborator>,
        closed_tx: mpsc::UnboundedSender<String>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = SessionActor {
            session_id: session_id.clone(),
            log: MessageLog::new(config.message_log_cap),
            suggestions: SuggestionStore::new(config.suggestion_cap),
            config,
            ai,
            commands: rx,
            self_tx: tx.clone(),
            closed_tx,
            presence: PresenceRegistry::new(),
            broadcaster: SessionBroadcaster::new(),
            conflicts: ConflictBoard::new(),
            teardown_epoch: 0,
        };

        tokio::spawn(actor.run());
        SessionHandle::new(session_id, tx)
    }

    async fn run(mut self) {
        tracing::info!("[Session] Session {} started", self.session_id);

        while let Some(command) = self.commands.recv().await {
            if self.handle_command(command) == Flow::Stop {
                break;
            }
        }

        tracing::info!("[Session] Session {} stopped", self.session_id);
        let _ = self.closed_tx.send(self.session_id.clone());
    }

    fn handle_command(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Connect {
                user_id,
                user_name,
                role,
                reply,
            } => {
                let _ = reply.send(Ok(self.connect(user_id, user_name, role)));
            }
            SessionCommand::Disconnect {
                user_id,
                connection_id,
            } => {
                self.disconnect(&user_id, &connection_id);
            }
            SessionCommand::SetStatus {
                user_id,
                status,
                reply,
            } => {
                let result = self.presence.set_status(&user_id, status);
                if result.is_ok() {
                    self.broadcast(
                        SessionEvent::presence_changed(self.presence.list()),
                        None,
                    );
                }
                let _ = reply.send(result);
            }
            SessionCommand::SendChat {
                user_id,
                body,
                reply,
            } => {
                let _ = reply.send(self.send_chat(&user_id, body));
            }
            SessionCommand::RequestSuggestions {
                user_id,
                kind,
                context,
                reply,
            } => {
                let _ = reply.send(self.request_suggestions(&user_id, kind, context));
            }
            SessionCommand::AcceptSuggestion {
                user_id,
                suggestion_id,
                reply,
            } => {
                let _ = reply.send(self.accept_suggestion(&user_id, &suggestion_id));
            }
            SessionCommand::RejectSuggestion {
                user_id,
                suggestion_id,
                reply,
            } => {
                let _ = reply.send(self.reject_suggestion(&user_id, &suggestion_id));
            }
            SessionCommand::ReportConflict {
                user_id,
                description,
                originating_event,
                reply,
            } => {
                let _ = reply.send(self.report_conflict(&user_id, description, originating_event));
            }
            SessionCommand::ResolveConflict {
                user_id,
                conflict_id,
                history,
                reply,
            } => {
                let _ = reply.send(self.resolve_conflict(&user_id, &conflict_id, history));
            }
            SessionCommand::ListCollaborators { reply } => {
                let _ = reply.send(Ok(self.presence.list()));
            }
            SessionCommand::ListMessages { reply } => {
                let _ = reply.send(Ok(self.log.messages()));
            }
            SessionCommand::ListPendingSuggestions { reply } => {
                let _ = reply.send(Ok(self.suggestions.list_pending()));
            }
            SessionCommand::ListConflicts { status, reply } => {
                let _ = reply.send(Ok(self.conflicts.list(status)));
            }
            SessionCommand::SuggestionsReady {
                job_id,
                kind,
                result,
            } => {
                self.suggestions_ready(&job_id, kind, result);
            }
            SessionCommand::ResolutionReady {
                conflict_id,
                result,
            } => {
                self.resolution_ready(&conflict_id, result);
            }
            SessionCommand::TeardownCheck { epoch } => {
                if epoch == self.teardown_epoch && self.presence.is_empty() {
                    tracing::info!(
                        "[Session] Session {} empty past grace period, tearing down",
                        self.session_id
                    );
                    return Flow::Stop;
                }
            }
        }
        Flow::Continue
    }

    fn connect(
        &mut self,
        user_id: String,
        user_name: String,
        role: crate::shared::collaborator::Role,
    ) -> Connected {
        // Any armed teardown timer is now stale.
        self.teardown_epoch += 1;

        let connection_id = Uuid::new_v4().to_string();
        let events = self.broadcaster.subscribe(&user_id, &connection_id);
        let rejoined = self.presence.get(&user_id).is_some();
        let (collaborator, active_count) = self.presence.join(&user_id, &user_name, role);

        tracing::info!(
            "[Session] {} ({}) connected to {} as {}, {} active",
            user_name,
            user_id,
            self.session_id,
            role,
            active_count
        );

        self.broadcast(SessionEvent::presence_changed(self.presence.list()), None);
        if !rejoined {
            let notice = self
                .log
                .append_system(format!("{} joined the session", user_name));
            self.broadcast(SessionEvent::message(notice), None);
        }

        Connected {
            collaborator,
            active_count,
            connection_id,
            events,
        }
    }

    fn disconnect(&mut self, user_id: &str, connection_id: &str) {
        // A reconnect may have displaced this connection already.
        if !self.broadcaster.unsubscribe(user_id, connection_id) {
            return;
        }

        let user_name = self.presence.get(user_id).map(|c| c.user_name.clone());
        let (removed, remaining) = self.presence.leave(user_id);
        if removed {
            tracing::info!(
                "[Session] {} disconnected from {}, {} remaining",
                user_id,
                self.session_id,
                remaining
            );
            self.broadcast(SessionEvent::presence_changed(self.presence.list()), None);
            if let Some(name) = user_name {
                let notice = self.log.append_system(format!("{} left the session", name));
                self.broadcast(SessionEvent::message(notice), None);
            }
        }

        if self.presence.is_empty() {
            self.arm_teardown();
        }
    }

    fn send_chat(&mut self, user_id: &str, body: String) -> CollabResult<crate::shared::Message> {
        if body.trim().is_empty() {
            return Err(CollabError::invalid("chat body must not be empty"));
        }
        let sender = self
            .presence
            .get(user_id)
            .cloned()
            .ok_or_else(|| CollabError::not_found("collaborator", user_id))?;

        self.presence.touch(user_id);
        let message = self.log.append_chat(user_id, sender.user_name, body);

        let exclude = if self.config.echo_chat_to_sender {
            None
        } else {
            Some(user_id.to_string())
        };
        self.broadcast(SessionEvent::message(message.clone()), exclude.as_deref());

        Ok(message)
    }

    fn request_suggestions(
        &mut self,
        user_id: &str,
        kind: crate::backend::ai::SuggestionRequestKind,
        context: serde_json::Value,
    ) -> CollabResult<SuggestionJob> {
        if self.presence.get(user_id).is_none() {
            return Err(CollabError::not_found("collaborator", user_id));
        }
        self.presence.touch(user_id);

        let job_id = Uuid::new_v4().to_string();
        let request = SuggestionRequest {
            session_id: self.session_id.clone(),
            kind,
            context,
        };

        tracing::info!(
            "[Session] Suggestion job {} ({}) dispatched for {} by {}",
            job_id,
            kind.as_str(),
            self.session_id,
            user_id
        );

        // Runs off the serialized path; the result re-enters the queue.
        let ai = Arc::clone(&self.ai);
        let tx = self.self_tx.clone();
        let timeout = self.config.ai_call_timeout;
        let task_job_id = job_id.clone();
        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, ai.suggest(request)).await {
                Ok(Ok(suggestions)) => Ok(suggestions),
                Ok(Err(e)) => Err(CollabError::upstream(e.to_string())),
                Err(_) => Err(CollabError::upstream(format!(
                    "suggestion request timed out after {}ms",
                    timeout.as_millis()
                ))),
            };
            let _ = tx.send(SessionCommand::SuggestionsReady {
                job_id: task_job_id,
                kind,
                result,
            });
        });

        Ok(SuggestionJob { job_id, kind })
    }

    fn suggestions_ready(
        &mut self,
        job_id: &str,
        kind: crate::backend::ai::SuggestionRequestKind,
        result: Result<Vec<crate::backend::ai::AiSuggestion>, CollabError>,
    ) {
        match result {
            Ok(proposals) => {
                tracing::info!(
                    "[Session] Suggestion job {} produced {} suggestion(s)",
                    job_id,
                    proposals.len()
                );
                for proposal in proposals {
                    let suggestion = self.suggestions.insert(Suggestion::new(
                        kind.category(),
                        proposal.title,
                        proposal.description,
                        proposal.priority,
                        proposal.payload,
                    ));
                    self.broadcast(SessionEvent::suggestion_created(suggestion), None);
                }
            }
            Err(error) => {
                tracing::warn!("[Session] Suggestion job {} failed: {}", job_id, error);
                let notice = self
                    .log
                    .append_system(format!("AI suggestion request failed: {}", error));
                self.broadcast(SessionEvent::message(notice), None);
            }
        }
    }

    fn accept_suggestion(
        &mut self,
        user_id: &str,
        suggestion_id: &str,
    ) -> CollabResult<Suggestion> {
        self.moderator(user_id, "accept suggestions")?;
        let outcome = self.suggestions.accept(suggestion_id)?;
        if outcome.transitioned {
            self.broadcast(
                SessionEvent::suggestion_updated(outcome.suggestion.clone()),
                None,
            );
        }
        Ok(outcome.suggestion)
    }

    fn reject_suggestion(
        &mut self,
        user_id: &str,
        suggestion_id: &str,
    ) -> CollabResult<Suggestion> {
        self.moderator(user_id, "reject suggestions")?;
        let outcome = self.suggestions.reject(suggestion_id)?;
        if outcome.transitioned {
            self.broadcast(
                SessionEvent::suggestion_updated(outcome.suggestion.clone()),
                None,
            );
        }
        Ok(outcome.suggestion)
    }

    fn report_conflict(
        &mut self,
        user_id: &str,
        description: String,
        originating_event: serde_json::Value,
    ) -> CollabResult<crate::shared::Conflict> {
        if description.trim().is_empty() {
            return Err(CollabError::invalid("conflict description must not be empty"));
        }
        if self.presence.get(user_id).is_none() {
            return Err(CollabError::not_found("collaborator", user_id));
        }
        self.presence.touch(user_id);

        let conflict = self.conflicts.report(description, originating_event);
        tracing::info!(
            "[Session] Conflict {} reported in {} by {}",
            conflict.id,
            self.session_id,
            user_id
        );
        self.broadcast(SessionEvent::conflict_detected(conflict.clone()), None);
        Ok(conflict)
    }

    fn resolve_conflict(
        &mut self,
        user_id: &str,
        conflict_id: &str,
        history: serde_json::Value,
    ) -> CollabResult<crate::shared::Conflict> {
        self.moderator(user_id, "resolve conflicts")?;

        let conflict = match self.conflicts.begin_resolution(conflict_id)? {
            BeginResolution::AlreadyResolved(conflict) => return Ok(conflict),
            BeginResolution::Started(conflict) => conflict,
        };

        tracing::info!(
            "[Session] Resolution attempt started for conflict {} in {}",
            conflict_id,
            self.session_id
        );

        let request = ResolutionRequest {
            session_id: self.session_id.clone(),
            conflict: conflict.clone(),
            history,
        };
        let ai = Arc::clone(&self.ai);
        let tx = self.self_tx.clone();
        let timeout = self.config.ai_call_timeout;
        let task_conflict_id = conflict_id.to_string();
        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, ai.resolve(request)).await {
                Ok(Ok(resolution)) => Ok(resolution),
                Ok(Err(e)) => Err(CollabError::upstream(e.to_string())),
                Err(_) => Err(CollabError::upstream(format!(
                    "conflict resolution timed out after {}ms",
                    timeout.as_millis()
                ))),
            };
            let _ = tx.send(SessionCommand::ResolutionReady {
                conflict_id: task_conflict_id,
                result,
            });
        });

        // The caller gets the conflict in `resolving` state; the terminal
        // outcome arrives via broadcast.
        Ok(conflict)
    }

    fn resolution_ready(
        &mut self,
        conflict_id: &str,
        result: Result<crate::backend::ai::AiResolution, CollabError>,
    ) {
        match result {
            Ok(resolution) => {
                match self.conflicts.complete_resolution(
                    conflict_id,
                    resolution.resolution_text.clone(),
                    resolution.resolution_data,
                ) {
                    Ok(conflict) => {
                        self.broadcast(SessionEvent::conflict_resolved(conflict), None);
                        let notice = self.log.append_system(format!(
                            "Conflict resolved: {}",
                            resolution.resolution_text
                        ));
                        self.broadcast(SessionEvent::message(notice), None);
                    }
                    Err(error) => {
                        tracing::error!(
                            "[Session] Could not commit resolution for {}: {}",
                            conflict_id,
                            error
                        );
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    "[Session] Resolution attempt for {} failed: {}",
                    conflict_id,
                    error
                );
                if let Err(e) = self.conflicts.fail_resolution(conflict_id) {
                    tracing::error!("[Session] Could not revert conflict {}: {}", conflict_id, e);
                    return;
                }
                let notice = self
                    .log
                    .append_system(format!("Conflict resolution failed: {}", error));
                self.broadcast(SessionEvent::message(notice), None);
            }
        }
    }

    /// Role gate for accept/reject/resolve; reads the live presence entry
    fn moderator(&self, user_id: &str, action: &'static str) -> CollabResult<Collaborator> {
        let collaborator = self
            .presence
            .get(user_id)
            .cloned()
            .ok_or_else(|| CollabError::not_found("collaborator", user_id))?;
        if !collaborator.role.can_moderate() {
            return Err(CollabError::forbidden(action, collaborator.role));
        }
        Ok(collaborator)
    }

    /// Broadcast an event, turning delivery failures into implicit leaves
    ///
    /// A dead peer is removed from presence and the departure is announced;
    /// that announcement can itself surface more dead peers, so this loops
    /// until delivery is clean.
    fn broadcast(&mut self, event: SessionEvent, exclude_user_id: Option<&str>) -> usize {
        let had_presence = !self.presence.is_empty();
        let outcome = self.broadcaster.broadcast(&event, exclude_user_id);
        let delivered = outcome.delivered;

        let mut dead = outcome.dead;
        while !dead.is_empty() {
            let mut next_dead = Vec::new();
            for user_id in dead {
                let user_name = self.presence.get(&user_id).map(|c| c.user_name.clone());
                let (removed, _) = self.presence.leave(&user_id);
                if !removed {
                    continue;
                }
                tracing::info!(
                    "[Session] Implicit leave for {} in {} (delivery failed)",
                    user_id,
                    self.session_id
                );
                let presence_event = SessionEvent::presence_changed(self.presence.list());
                next_dead.extend(self.broadcaster.broadcast(&presence_event, None).dead);
                if let Some(name) = user_name {
                    let notice = self.log.append_system(format!("{} left the session", name));
                    let notice_event = SessionEvent::message(notice);
                    next_dead.extend(self.broadcaster.broadcast(&notice_event, None).dead);
                }
            }
            dead = next_dead;
        }

        if had_presence && self.presence.is_empty() {
            self.arm_teardown();
        }

        delivered
    }

    fn arm_teardown(&mut self) {
        self.teardown_epoch += 1;
        let epoch = self.teardown_epoch;
        let grace = self.config.session_teardown_grace;
        let tx = self.self_tx.clone();

        tracing::debug!(
            "[Session] Session {} empty, teardown armed for {}ms",
            self.session_id,
            grace.as_millis()
        );

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = tx.send(SessionCommand::TeardownCheck { epoch });
        });
    }
}
