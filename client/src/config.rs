//! Endpoint configuration for the GraphQL remote.

/// Where the GraphQL backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Full URL of the GraphQL endpoint.
    pub endpoint: String,
}

impl RemoteConfig {
    /// Default endpoint, matching the development server.
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:4000/graphql";

    /// Environment variable that overrides the endpoint.
    pub const ENDPOINT_VAR: &'static str = "TODOFLOW_GRAPHQL_URL";

    /// Configuration pointing at `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Configuration from the environment, falling back to the default
    /// endpoint when `TODOFLOW_GRAPHQL_URL` is unset or empty.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(Self::ENDPOINT_VAR) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self::new(endpoint),
            _ => Self::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENDPOINT)
    }
}
