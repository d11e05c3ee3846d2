use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schedule, scope or policy input, caught before any request is sent
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("backup_type is SelectedItems but no selection predicate is present")]
    IncompleteScope,

    /// The service rejected a mutating request
    #[error("request rejected with status {status}: {body}")]
    Submission { status: u16, body: String },

    #[error("not authenticated (401): {body}")]
    Unauthorized { body: String },

    #[error("forbidden (403): {body}")]
    Forbidden { body: String },

    /// Non-2xx answer to a read
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },

    /// The service accepted the request but answered with an inconsistent document
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("session {session_id} still '{status}' after {elapsed:?}")]
    Timeout {
        session_id: String,
        status: String,
        elapsed: Duration,
    },

    #[error("waiting for session {session_id} was cancelled")]
    Cancelled { session_id: String },

    #[error("{path} not found")]
    NotFound { path: String },

    #[error("session {session_id} succeeded but reported no resource id")]
    MissingIdentity { session_id: String },

    #[error("session {session_id} finished with status '{status}'")]
    SessionFailed { session_id: String, status: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Name of the offending field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_field() {
        let err = Error::validation("daily_schedule.runs_per_hour", "must be between 1 and 24");
        assert_eq!(err.field(), Some("daily_schedule.runs_per_hour"));
        assert_eq!(
            err.to_string(),
            "invalid value for daily_schedule.runs_per_hour: must be between 1 and 24"
        );
    }

    #[test]
    fn submission_carries_status_and_body() {
        let err = Error::Submission {
            status: 409,
            body: "conflict".to_string(),
        };
        assert!(err.to_string().contains("409"));
        assert_eq!(err.field(), None);
    }
}
