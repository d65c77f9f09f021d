pub type StarfallResult<T> = Result<T, StarfallError>;

#[derive(thiserror::Error, Debug)]
pub enum StarfallError {
    #[error("config error: {0}")]
    Config(String),

    #[error("color error: {0}")]
    Color(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StarfallError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }
}
