//! The editing-session state machine.
//!
//! One session edits one module document at a time. The only concurrency
//! concern is request cancellation: a `load_module` call supersedes any
//! in-flight load, and the superseded response is discarded without touching
//! session state (switch-to-latest). Cancellation is implemented with a
//! generation counter: each load captures the generation it was issued
//! under and applies its result only if that generation is still current.
//!
//! The state lock is never held across an await point and never held while
//! calling the notifier.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use dsm_model::{Binding, ExportPayload, Module};

use crate::error::SessionError;
use crate::notifier::Notifier;
use crate::repository::{ModuleRepository, ModuleSummary, RepositoryAck, RepositoryError};

/// Coarse session phase, for gating UI affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Result of a completed `load_module` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document was applied. `id_mismatch` flags the non-fatal case of
    /// the server returning a different id than requested.
    Loaded { id_mismatch: bool },
    /// A newer load (or a clear) superseded this one; its response was
    /// discarded and session state is untouched.
    Superseded,
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    loading: Option<String>,
    working: Option<Module>,
    snapshot: Option<Module>,
    failed: bool,
    saving: bool,
    selected_binding: Option<String>,
    edit_allowed: bool,
}

pub struct EditSession {
    repository: Arc<dyn ModuleRepository>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
}

impl EditSession {
    pub fn new(repository: Arc<dyn ModuleRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
            state: Mutex::new(SessionState {
                edit_allowed: true,
                ..SessionState::default()
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> SessionPhase {
        let state = self.lock_state();
        if state.loading.is_some() {
            SessionPhase::Loading
        } else if state.working.is_some() {
            SessionPhase::Ready
        } else if state.failed {
            SessionPhase::Failed
        } else {
            SessionPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading.is_some()
    }

    /// Whether the loaded document allows editing (`settings.editable`,
    /// defaulting to true), refreshed on every successful load.
    pub fn edit_allowed(&self) -> bool {
        self.lock_state().edit_allowed
    }

    /// A copy of the working document, if one is loaded.
    pub fn module(&self) -> Option<Module> {
        self.lock_state().working.clone()
    }

    /// Read the working document in place. The closure must not call back
    /// into the session.
    pub fn with_module<R>(&self, f: impl FnOnce(&Module) -> R) -> Option<R> {
        self.lock_state().working.as_ref().map(f)
    }

    /// Mutate the working document in place. The snapshot is unaffected;
    /// [`EditSession::has_changes`] reflects the divergence. The closure
    /// must not call back into the session.
    pub fn with_module_mut<R>(&self, f: impl FnOnce(&mut Module) -> R) -> Option<R> {
        self.lock_state().working.as_mut().map(f)
    }

    /// Structural inequality between the working document and the snapshot.
    pub fn has_changes(&self) -> bool {
        let state = self.lock_state();
        state.working != state.snapshot
    }

    pub fn savable(&self) -> bool {
        self.lock_state()
            .working
            .as_ref()
            .is_some_and(|m| !m.id.is_empty())
    }

    /// Load a module by id, superseding any in-flight load.
    ///
    /// A refetch of the already-visible id keeps the working document on
    /// screen until the response lands; loading a different id clears it
    /// immediately so stale content is never shown under a new id.
    pub async fn load_module(&self, id: &str) -> Result<LoadOutcome, SessionError> {
        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.failed = false;
            let same_id = state.working.as_ref().is_some_and(|m| m.id == id);
            if !same_id {
                state.working = None;
                state.snapshot = None;
                state.selected_binding = None;
            }
            state.loading = Some(id.to_string());
            state.generation
        };
        tracing::info!(%id, generation, "loading module");

        let result = self.repository.get_full(id).await;

        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!(%id, generation, "discarding superseded load response");
            return Ok(LoadOutcome::Superseded);
        }
        state.loading = None;

        let error = match result {
            Ok(document) => match parse_document(&document) {
                Ok(module) => {
                    let id_mismatch = module.id != id;
                    state.edit_allowed = module.is_editable();
                    state.snapshot = Some(module.clone());
                    state.working = Some(module);
                    state.selected_binding = None;
                    drop(state);
                    if id_mismatch {
                        tracing::warn!(requested = %id, "server returned a different module id");
                        self.notifier.warning(
                            &format!("The server returned a different module id than requested ({id})."),
                            "Module Mismatch",
                        );
                    } else {
                        tracing::info!(%id, "module loaded");
                    }
                    return Ok(LoadOutcome::Loaded { id_mismatch });
                }
                Err(reason) => SessionError::LoadInvalidPayload {
                    id: id.to_string(),
                    reason,
                },
            },
            Err(repo_error) => classify_load_failure(id, repo_error),
        };

        state.failed = true;
        state.working = None;
        state.snapshot = None;
        state.selected_binding = None;
        drop(state);

        tracing::error!(%id, %error, "module load failed");
        self.notifier.error(&error.user_message(), error.title());
        Err(error)
    }

    /// Replace the working document with a fresh copy of the snapshot.
    /// Warns and returns false when there is nothing to revert to.
    pub fn revert(&self) -> bool {
        let mut state = self.lock_state();
        match state.snapshot.clone() {
            Some(snapshot) => {
                let selection_survives = state
                    .selected_binding
                    .as_deref()
                    .is_some_and(|id| snapshot.binding(id).is_some());
                if !selection_survives {
                    state.selected_binding = None;
                }
                state.working = Some(snapshot);
                true
            }
            None => {
                drop(state);
                tracing::warn!("revert requested without a snapshot");
                self.notifier
                    .warning("No saved snapshot to revert to.", "Nothing to Revert");
                false
            }
        }
    }

    /// Save the working document through the repository.
    ///
    /// Fails locally (`SaveNoId`) when the document has no id, without
    /// contacting the repository. A save issued while another is
    /// outstanding is rejected (`SaveInProgress`). On success the snapshot
    /// becomes the document as sent, so the saved state is the new revert
    /// target; on failure both working document and snapshot are unchanged.
    pub async fn save(&self) -> Result<RepositoryAck, SessionError> {
        let document = {
            let mut state = self.lock_state();
            let module = state.working.as_ref().filter(|m| !m.id.is_empty()).cloned();
            match module {
                Some(module) => {
                    if state.saving {
                        drop(state);
                        let error = SessionError::SaveInProgress;
                        self.notifier.error(&error.user_message(), error.title());
                        return Err(error);
                    }
                    state.saving = true;
                    module
                }
                None => {
                    drop(state);
                    let error = SessionError::SaveNoId;
                    self.notifier.error(&error.user_message(), error.title());
                    return Err(error);
                }
            }
        };

        let result = self.repository.update(&document.id, &document).await;

        let mut state = self.lock_state();
        state.saving = false;
        match result {
            Ok(ack) => {
                // The session may have moved on (clear or a different load)
                // while the save was in flight; only then skip the snapshot.
                if state.working.as_ref().is_some_and(|w| w.id == document.id) {
                    state.snapshot = Some(document.clone());
                }
                drop(state);
                tracing::info!(id = %document.id, "module saved");
                self.notifier.success(
                    "Successfully updated the server. Changes should be effective immediately.",
                    "Module Saved",
                );
                Ok(ack)
            }
            Err(repo_error) => {
                drop(state);
                let error = SessionError::SaveRejected {
                    message: repo_error.to_string(),
                };
                tracing::error!(id = %document.id, %error, "module save failed");
                self.notifier.error(&error.user_message(), error.title());
                Err(error)
            }
        }
    }

    /// Drop the working document and snapshot and return to `Idle`. Any
    /// in-flight load is superseded and its response will be discarded.
    pub fn clear_module(&self) {
        let mut state = self.lock_state();
        state.generation += 1;
        state.loading = None;
        state.working = None;
        state.snapshot = None;
        state.failed = false;
        state.selected_binding = None;
        state.edit_allowed = true;
    }

    pub fn selected_binding(&self) -> Option<String> {
        self.lock_state().selected_binding.clone()
    }

    /// Select a binding by id; `None` clears the selection. Selecting an id
    /// the document does not contain is refused.
    pub fn select_binding(&self, id: Option<&str>) -> bool {
        let mut state = self.lock_state();
        match id {
            None => {
                state.selected_binding = None;
                true
            }
            Some(id) => {
                let exists = state
                    .working
                    .as_mut()
                    .and_then(|m| m.binding_mut(id))
                    .map(Binding::ensure_code_set)
                    .is_some();
                if exists {
                    state.selected_binding = Some(id.to_string());
                }
                exists
            }
        }
    }

    /// Guarantee a sane selection: keep the current one if it still exists,
    /// otherwise fall back to the first binding, otherwise no selection.
    pub fn ensure_selection(&self) -> Option<String> {
        let mut state = self.lock_state();
        let current_survives = match (&state.selected_binding, &state.working) {
            (Some(id), Some(module)) => module.binding(id).is_some(),
            _ => false,
        };
        if !current_survives {
            let fallback = state
                .working
                .as_ref()
                .and_then(|m| m.rules.bindings.first())
                .map(|b| b.id.clone());
            state.selected_binding = fallback;
        }
        state.selected_binding.clone()
    }

    /// Append a fresh binding from template and select it.
    pub fn create_binding(&self) -> Option<String> {
        let mut state = self.lock_state();
        let module = state.working.as_mut()?;
        let binding = Binding::from_template();
        let id = binding.id.clone();
        module.rules.bindings.push(binding);
        state.selected_binding = Some(id.clone());
        Some(id)
    }

    /// Deep-copy a binding (`-copy` id suffix) and select the copy.
    pub fn duplicate_binding(&self, id: &str) -> Option<String> {
        let mut state = self.lock_state();
        let module = state.working.as_mut()?;
        let copy = module.binding(id)?.duplicated();
        let copy_id = copy.id.clone();
        module.rules.bindings.push(copy);
        state.selected_binding = Some(copy_id.clone());
        Some(copy_id)
    }

    /// Remove a binding by id. Deleting the selected binding falls back to
    /// the first remaining binding rather than leaving a dangling
    /// selection.
    pub fn delete_binding(&self, id: &str) -> bool {
        let mut state = self.lock_state();
        let Some(module) = state.working.as_mut() else {
            return false;
        };
        if !module.remove_binding(id) {
            return false;
        }
        if state.selected_binding.as_deref() == Some(id) {
            let fallback = state
                .working
                .as_ref()
                .and_then(|m| m.rules.bindings.first())
                .map(|b| b.id.clone());
            state.selected_binding = fallback;
        }
        true
    }

    /// Serialize the working document for download. When editing is
    /// permitted the exported copy carries `editable = !lock_editing`;
    /// otherwise the stored settings are exported untouched.
    pub fn export(&self, lock_editing: bool) -> Option<ExportPayload> {
        let state = self.lock_state();
        let module = state.working.as_ref()?;
        let editable = state.edit_allowed.then_some(!lock_editing);
        let result = module.export(editable);
        drop(state);
        match result {
            Ok(payload) => Some(payload),
            Err(error) => {
                tracing::error!(%error, "module export failed");
                self.notifier
                    .error("The module could not be serialized for download.", "Export Failed");
                None
            }
        }
    }

    /// Pass-through to the repository listing.
    pub async fn list_modules(&self) -> Result<Vec<ModuleSummary>, RepositoryError> {
        self.repository.list().await
    }

    /// Pass-through to the repository enable/disable toggles.
    pub async fn set_module_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<RepositoryAck, RepositoryError> {
        if enabled {
            self.repository.enable(id).await
        } else {
            self.repository.disable(id).await
        }
    }
}

/// Minimal sanity check plus typed parse of a repository payload.
fn parse_document(document: &Value) -> Result<Module, String> {
    if !document.is_object() {
        return Err("document is not a JSON object".to_string());
    }
    let id = document.get("id").and_then(Value::as_str).unwrap_or("");
    if id.is_empty() {
        return Err("document has no id".to_string());
    }
    serde_json::from_value(document.clone()).map_err(|e| format!("document did not parse: {e}"))
}

fn classify_load_failure(id: &str, error: RepositoryError) -> SessionError {
    match error {
        RepositoryError::NotFound { .. } => SessionError::LoadNotFound { id: id.to_string() },
        RepositoryError::Network { message } => SessionError::LoadNetwork {
            id: id.to_string(),
            message,
        },
        RepositoryError::InvalidPayload { message } => SessionError::LoadInvalidPayload {
            id: id.to_string(),
            reason: message,
        },
        RepositoryError::Rejected { message } => SessionError::LoadInvalidPayload {
            id: id.to_string(),
            reason: message,
        },
    }
}
