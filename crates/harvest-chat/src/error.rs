use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Empty or whitespace-only message
    #[error("message is empty")]
    InvalidInput,

    /// No API key configured
    #[error("chatbot is not configured")]
    ServiceUnavailable,

    /// Transport failure, non-2xx status, or a reply without text
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::UpstreamFailure(format!("request timed out: {}", err))
        } else {
            ChatError::UpstreamFailure(err.to_string())
        }
    }
}
