pub type ChromaResult<T> = Result<T, ChromaError>;

#[derive(thiserror::Error, Debug)]
pub enum ChromaError {
    #[error("stream unavailable: {0}")]
    StreamUnavailable(String),

    #[error("image load error: {0}")]
    ImageLoad(String),

    #[error("dimension error: {0}")]
    Dimension(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("sink error: {0}")]
    Sink(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChromaError {
    pub fn stream_unavailable(msg: impl Into<String>) -> Self {
        Self::StreamUnavailable(msg.into())
    }

    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }
}
