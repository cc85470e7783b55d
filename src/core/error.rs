use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ConsoleError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("unauthorized")]
    Unauthorized,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConsoleError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized)
    }

    /// Message shown in the dashboard. Transport and shape problems collapse
    /// into one generic line; the detail goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Network(_) | ConsoleError::Timeout | ConsoleError::MalformedResponse(_) => {
                "Failed to load data from the server.".to_string()
            }
            ConsoleError::Unauthorized => "Session expired. Please sign in again.".to_string(),
            ConsoleError::Validation(msg) => format!("Save failed: {}", msg),
            ConsoleError::Config(msg) => format!("Configuration error: {}", msg),
            ConsoleError::Io(err) => format!("I/O error: {}", err),
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConsoleError::Timeout
        } else if err.is_decode() {
            ConsoleError::MalformedResponse(err.to_string())
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_failures_are_malformed_responses() {
        let err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        assert!(matches!(
            ConsoleError::from(err),
            ConsoleError::MalformedResponse(_)
        ));
    }
}
