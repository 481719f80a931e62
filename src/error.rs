use thiserror::Error;

/// Main error type for ireval
#[derive(Error, Debug)]
pub enum IrevalError {
    /// Malformed input data (bad numeric field, missing column)
    #[error("Format error: {0}")]
    Format(String),

    /// Too few observations for the requested computation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search service errors
    #[error("Search service error: {0}")]
    SearchService(String),
}

/// Convenient Result type using IrevalError
pub type Result<T> = std::result::Result<T, IrevalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrevalError::Format("line 3: bad grade".to_string());
        assert!(err.to_string().contains("Format error"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ireval_err: IrevalError = io_err.into();
        assert!(matches!(ireval_err, IrevalError::Io(_)));
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = IrevalError::InsufficientData("1 paired query, need at least 2".to_string());
        assert!(err.to_string().contains("Insufficient data"));
    }
}
