pub type FramescrubResult<T> = Result<T, FramescrubError>;

#[derive(thiserror::Error, Debug)]
pub enum FramescrubError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("seek error: {0}")]
    Seek(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramescrubError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn seek(msg: impl Into<String>) -> Self {
        Self::Seek(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            FramescrubError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            FramescrubError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(FramescrubError::seek("x").to_string().contains("seek error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = FramescrubError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
