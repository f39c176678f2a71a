//! The default module seed, embedded at compile time.

use dsm_model::Module;

use crate::error::RegistryError;

pub const DEFAULT_MODULE_ID: &str = "default-42cfr-part2";

const DEFAULT_MODULE_JSON: &str = include_str!("../data/default-42cfr-part2.json");

/// Parse the embedded 42 CFR Part 2 reference module.
pub fn default_module() -> Result<Module, RegistryError> {
    serde_json::from_str(DEFAULT_MODULE_JSON).map_err(|source| RegistryError::EmbeddedModule {
        id: DEFAULT_MODULE_ID,
        source,
    })
}
