use thiserror::Error;

/// Typed failure surface for the lookup pipeline.
///
/// `NameNotFound` and `ContactNotFound` are expected outcomes carried to the
/// HTTP boundary for specific status mapping; every other variant is rendered
/// there as an opaque 500 with the detail kept server-side.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// No resolver is bound to the name in the ENS registry
    #[error("ENS name was not found: {name}")]
    NameNotFound { name: String },

    /// The name resolves to an address but carries no phone text record
    #[error("ENS name did not have a phone number: {name} (address {address})")]
    ContactNotFound { name: String, address: String },

    /// Cache/Redis errors
    #[error("Cache Error: {0}")]
    CacheError(String),

    /// JSON-RPC/provider errors
    #[error("RPC Error: {0}")]
    RpcError(String),

    /// Serialization errors for cached records
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// Unknown/unclassified errors
    #[error("Unknown Error: {0}")]
    Unknown(String),
}

// Implement From<serde_json::Error> for LookupError
impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::ParseError(format!("JSON serialization/deserialization error: {}", err))
    }
}

// Implement From<anyhow::Error> for LookupError
impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        LookupError::ConfigError(format!("Startup error: {}", err))
    }
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, LookupError>;
