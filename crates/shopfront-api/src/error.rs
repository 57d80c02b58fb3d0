use thiserror::Error;

/// Errors returned by the storefront API client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The server answered with a non-2xx status. `message` carries the
    /// server's error body when one was parseable.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiClientError {
    /// `true` for a 401 response — the caller's token is missing or stale.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// `true` for a 404 response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_predicate_matches_only_401() {
        let unauthorized = ApiClientError::Status {
            status: 401,
            message: "invalid token".to_string(),
        };
        let not_found = ApiClientError::Status {
            status: 404,
            message: "no such product".to_string(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!not_found.is_unauthorized());
        assert!(not_found.is_not_found());
    }
}
