use serde::Serialize;
use thiserror::Error;

/// Why an analysis attempt did not produce a [`ResultText`](crate::ResultText).
#[derive(Debug, Error)]
pub enum TutorError {
    /// The image could not be opened, rewound, or read.
    #[error("image input error: {0}")]
    Input(#[from] std::io::Error),

    /// The request never got a response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("remote returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Success status, but the body was not the expected completion shape.
    #[error("unexpected response format: {0}")]
    ResponseFormat(String),
}

/// Discriminant of [`TutorError`], for callers that branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Transport,
    Remote,
    ResponseFormat,
}

impl TutorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Input,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::ResponseFormat(_) => ErrorKind::ResponseFormat,
        }
    }

    /// HTTP status for remote failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The banner text shown to the user.
    pub fn user_message(&self) -> String {
        format!("API 요청 오류: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_carries_status_and_body() {
        let err = TutorError::Remote {
            status: 401,
            body: "{\"error\":\"invalid_api_key\"}".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status(), Some(401));
        let msg = err.user_message();
        assert!(msg.starts_with("API 요청 오류: "));
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid_api_key"));
    }

    #[test]
    fn test_io_error_becomes_input_kind() {
        let err: TutorError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated").into();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ResponseFormat).unwrap();
        assert_eq!(json, "\"response_format\"");
    }
}
