use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContribError>;

#[derive(Error, Debug)]
pub enum ContribError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GraphQL API returned errors: {0}")]
    Protocol(serde_json::Value),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid timestamp '{input}': {source}")]
    Timestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl ContribError {
    /// True for errors reported by the GraphQL layer itself (HTTP 200 with an
    /// `errors` payload), as opposed to transport or decoding failures.
    pub fn is_protocol(&self) -> bool {
        matches!(self, ContribError::Protocol(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn protocol_error_displays_payload() {
        let err = ContribError::Protocol(json!([{ "message": "Bad credentials" }]));
        assert!(err.is_protocol());
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn timestamp_error_names_input() {
        let source = chrono::DateTime::parse_from_rfc3339("nope").unwrap_err();
        let err = ContribError::Timestamp {
            input: "nope".to_string(),
            source,
        };
        assert!(!err.is_protocol());
        assert!(err.to_string().contains("'nope'"));
    }
}
