use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NextcloudError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    LoginFlowTimeout(String),

    #[error("Remote service error (status {status}): {body}")]
    RemoteService { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Maximum length for response bodies kept in errors
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl NextcloudError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }

        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        NextcloudError::RemoteService {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, NextcloudError::LoginFlowTimeout(_))
    }

    /// HTTP (or OCS) status carried by a remote service error
    pub fn status(&self) -> Option<u16> {
        match self {
            NextcloudError::RemoteService { status, .. } => Some(*status),
            NextcloudError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
