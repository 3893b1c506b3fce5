use thiserror::Error;

/// Errors that can occur while talking to the messaging service or loading
/// workflow resources.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The service reported that the addressed entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected or failed to process the request.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A workflow resource could not be read.
    #[error("resource error: {path}: {message}")]
    Resource { path: String, message: String },
}

impl MessagingError {
    pub fn resource(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Resource {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MessagingError::NotFound("stream S1".into());
        assert_eq!(err.to_string(), "not found: stream S1");

        let err = MessagingError::ExecutionFailed("stream is read-only".into());
        assert_eq!(err.to_string(), "execution failed: stream is read-only");

        let err = MessagingError::resource("/tmp/a.png", "permission denied");
        assert_eq!(err.to_string(), "resource error: /tmp/a.png: permission denied");
    }

    #[test]
    fn resource_helper_formats_the_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        match MessagingError::resource("/tmp/missing.png", io) {
            MessagingError::Resource { path, message } => {
                assert_eq!(path, "/tmp/missing.png");
                assert_eq!(message, "no such file");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
