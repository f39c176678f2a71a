pub mod default_module;
pub mod error;
pub mod registry;

pub use default_module::{DEFAULT_MODULE_ID, default_module};
pub use error::RegistryError;
pub use registry::ModuleRegistry;
