//! The external module repository contract.
//!
//! The repository is a collaborator, not part of this core: transport,
//! authentication, retries, and timeouts all live behind this trait. The
//! session only needs terminal success or failure per logical request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use dsm_model::Module;

/// One row of the module listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

/// Acknowledgement returned by mutating repository operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryAck {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("module {id} not found")]
    NotFound { id: String },
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },
    #[error("server rejected the request: {message}")]
    Rejected { message: String },
}

/// CRUD interface to the external module store.
///
/// `get_full` returns the raw JSON document rather than a typed module: the
/// session owns payload validation so that malformed documents are
/// classified at the session boundary instead of inside the transport.
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ModuleSummary>, RepositoryError>;

    async fn get_full(&self, id: &str) -> Result<Value, RepositoryError>;

    async fn update(&self, id: &str, module: &Module) -> Result<RepositoryAck, RepositoryError>;

    async fn enable(&self, id: &str) -> Result<RepositoryAck, RepositoryError>;

    async fn disable(&self, id: &str) -> Result<RepositoryAck, RepositoryError>;
}
