//! Error types for debate sends.

use thiserror::Error;

use super::types::Side;

/// Failure modes of a single side's send.
#[derive(Error, Debug)]
pub enum SendError {
    /// The send was cancelled before the reply completed.
    #[error("send to {0} side was cancelled")]
    Cancelled(Side),

    /// The request could not be issued or the stream failed.
    #[error("{side} side request failed: {reason}")]
    RequestFailed { side: Side, reason: String },

    /// The backend responded with a non-success status.
    #[error("{side} side request returned HTTP status {code}")]
    HttpStatus { side: Side, code: u16 },

    /// The backend did not assign a conversation identifier.
    #[error("{0} side response is missing a conversation id")]
    MissingConversationId(Side),
}

impl SendError {
    /// Whether this error is a deliberate cancellation. Cancellations are
    /// quiet; every other variant is surfaced to the caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SendError::Cancelled(_))
    }
}

/// Result alias for debate send operations.
pub type SendResult<T> = Result<T, SendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_quiet() {
        assert!(SendError::Cancelled(Side::Left).is_cancelled());
        assert!(!SendError::MissingConversationId(Side::Left).is_cancelled());
        assert!(!SendError::HttpStatus {
            side: Side::Right,
            code: 500
        }
        .is_cancelled());
    }

    #[test]
    fn test_error_messages_name_the_side() {
        let err = SendError::RequestFailed {
            side: Side::Right,
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("right"));
        assert!(err.to_string().contains("connection refused"));
    }
}
