pub mod binding;
pub mod error;
pub mod hierarchy;
pub mod module;
pub mod policy;
pub mod terminology;

pub use binding::{Binding, CodeSet, CodeSetCoding, Coding};
pub use error::ModelError;
pub use hierarchy::{ACT_CODE_SYSTEM, HierarchyNode, available_parents, set_parent};
pub use module::{ExportPayload, Module, ModuleSettings, Rules};
pub use policy::Policy;
pub use terminology::{CodeSystem, SUPPORTED_CODE_SYSTEMS, code_system_name};
