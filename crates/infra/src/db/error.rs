use thiserror::Error;

/// Database adapter error.
///
/// Every adapter operation returns either rows or one of these; there is no
/// retry anywhere below this type.
#[derive(Debug, Error)]
pub enum DbError {
    /// The client could not be built from the given credentials.
    #[error("invalid database configuration: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("remote error ({status}): {message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The service answered, but the body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl DbError {
    pub fn remote(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            code,
            message: message.into(),
        }
    }

    /// Unique-constraint violations and other conflicts reported by the service.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Remote { status: 409, .. })
    }
}
