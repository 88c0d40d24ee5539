use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Network failure, timeout or non-success status. Recovered by writing
    /// the zeroed stats record.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Anything else, e.g. a malformed response body. Nothing is written.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl StatsError {
    pub fn exit_code(&self) -> u8 {
        match self {
            StatsError::Transport(_) | StatsError::Unexpected(_) => 1,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, StatsError::Transport(_))
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Transport(err.to_string())
    }
}
