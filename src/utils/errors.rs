use thiserror::Error;

/// Main error type for the EcoSmart chat client
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with an explicit error marker
    #[error("Server error: {0}")]
    Server(String),

    /// Non-success status without a usable error marker
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Well-formed reply carrying neither a result nor an error marker
    #[error("Empty reply (status {0})")]
    EmptyReply(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UI error: {0}")]
    Ui(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Network(err.to_string())
        }
    }
}

impl ChatError {
    /// True for failures where no server reply was obtained at all
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Network(_))
    }
}
