use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse embedded module {id}: {source}")]
    EmbeddedModule {
        id: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
