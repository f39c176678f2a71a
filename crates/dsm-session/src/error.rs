//! Session error taxonomy.
//!
//! Every repository-facing failure is caught at the session boundary and
//! converted to one of these kinds; no public session operation surfaces an
//! unclassified fault.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested id does not exist on the server.
    #[error("module {id} was not found on the server")]
    LoadNotFound { id: String },

    /// Connectivity failure; retryable by user action, never auto-retried.
    #[error("module {id} could not be fetched: {message}")]
    LoadNetwork { id: String, message: String },

    /// The server returned something that is not a usable module document.
    #[error("module {id} payload is invalid: {reason}")]
    LoadInvalidPayload { id: String, reason: String },

    /// Local precondition failure; the repository is never contacted.
    #[error("no module id available, cannot save")]
    SaveNoId,

    /// A save is already outstanding for this session.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// The repository refused or failed the save; the working document and
    /// snapshot are preserved so the user can retry or export.
    #[error("module could not be saved: {message}")]
    SaveRejected { message: String },
}

impl SessionError {
    /// User-facing notification body for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::LoadNotFound { .. } => {
                "The module could not be found. It may have been deleted.".to_string()
            }
            Self::LoadNetwork { .. } => {
                "The module couldn't be loaded. Check the ID and your connectivity and try again."
                    .to_string()
            }
            Self::LoadInvalidPayload { .. } => {
                "The module couldn't be loaded. The server returned an unusable document."
                    .to_string()
            }
            Self::SaveNoId => "No module ID available. Cannot save.".to_string(),
            Self::SaveInProgress => {
                "A save is already in progress. Wait for it to finish and try again.".to_string()
            }
            Self::SaveRejected { .. } => {
                "Module could not be saved to remote server. Try downloading it locally and posting it later?"
                    .to_string()
            }
        }
    }

    /// Notification title paired with [`SessionError::user_message`].
    pub fn title(&self) -> &'static str {
        match self {
            Self::LoadNotFound { .. }
            | Self::LoadNetwork { .. }
            | Self::LoadInvalidPayload { .. } => "Couldn't load Module",
            Self::SaveNoId | Self::SaveInProgress | Self::SaveRejected { .. } => "Error Saving",
        }
    }
}
