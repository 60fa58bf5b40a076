//! Error type for remote service operations.

use thiserror::Error;

/// A failed remote call.
///
/// The machines do not distinguish failure kinds structurally — whatever
/// went wrong, they record the rendered message into their context and move
/// on. The split below exists so transports can keep server-reported
/// failures (invalid credentials, duplicate email, unknown id) apart from
/// their own plumbing failures in logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The server processed the request and reported a failure.
    ///
    /// Carries the server's message verbatim (e.g. the first GraphQL error).
    #[error("{0}")]
    Api(String),

    /// The request never produced a usable server response
    /// (connection, HTTP status, or decode failure).
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// The single human-readable message surfaced to the machines.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_render_the_server_message_verbatim() {
        let err = RemoteError::Api("Invalid credentials".to_string());
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[test]
    fn transport_errors_are_prefixed() {
        let err = RemoteError::Transport("connection refused".to_string());
        assert_eq!(err.message(), "transport error: connection refused");
    }
}
