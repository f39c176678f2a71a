pub mod error;
pub mod notifier;
pub mod repository;
pub mod session;

pub use error::SessionError;
pub use notifier::{LogNotifier, Notifier};
pub use repository::{ModuleRepository, ModuleSummary, RepositoryAck, RepositoryError};
pub use session::{EditSession, LoadOutcome, SessionPhase};
