use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request rejected with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("username {0:?} cannot be sent as a header")]
    InvalidUsername(String),
    #[error("{0:?} is not a usable API base URL")]
    InvalidUrl(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Transport(err) => err.status(),
            GatewayError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            GatewayError::Rejected { status, .. } => Some(*status),
            GatewayError::InvalidUsername(_) | GatewayError::InvalidUrl(_) => None,
        }
    }
}
