//! API Error Types
//!
//! Failures produced while talking to the DenseEdia service. Every variant is terminal
//! for the attempt: nothing is retried automatically.

use thiserror::Error;

/// Remote request errors
///
/// - `Transport` - the request never completed
/// - `Decode` - the response body is not valid JSON, or not the expected shape
/// - `Application` - non-2xx status; `detail` is shown to the user verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or no response arrived
    #[error("Error while doing the request: {0}")]
    Transport(String),

    /// The response could not be decoded
    #[error("Error while converting to JSON: {0}")]
    Decode(String),

    /// The service answered with an error status
    #[error("{detail}")]
    Application { status: u16, detail: String },
}

impl ApiError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an application error
    pub fn application(status: u16, detail: impl Into<String>) -> Self {
        Self::Application {
            status,
            detail: detail.into(),
        }
    }

    /// Create a 404 application error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::application(404, detail)
    }

    /// HTTP status for application errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_displays_detail_verbatim() {
        let err = ApiError::application(422, "Element name already used");
        assert_eq!(err.to_string(), "Element name already used");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_transport_and_decode_messages() {
        assert_eq!(
            ApiError::transport("connection refused").to_string(),
            "Error while doing the request: connection refused"
        );
        assert_eq!(ApiError::decode("eof").status(), None);
        assert_eq!(ApiError::not_found("Edium not found").status(), Some(404));
    }
}
