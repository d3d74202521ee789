use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error types.
///
/// Input-side failures (a fragment that cannot be read, decoded or parsed) are
/// contained per file by the loader and formatter, which log them and move on.
/// Schema violations and output failures propagate and abort the run.
///
/// # Examples
///
/// ```
/// use sitepack_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::MissingDomain { file: "a.json".to_string() })
/// }
///
/// assert!(example().is_err());
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the configured text encodings could decode the file.
    #[error("{} could not be decoded with any of: {encodings}", path.display())]
    Undecodable { path: PathBuf, encodings: String },

    /// The file content is not valid JSON.
    #[error("Error decoding JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The fragment's top-level value is not an object.
    #[error("{} cannot be converted to a dictionary", path.display())]
    NotAnObject { path: PathBuf },

    /// A fragment carries `conf` but no `domain` to file it under.
    #[error("{file} has a \"conf\" entry but no \"domain\" field")]
    MissingDomain { file: String },

    /// A fragment's `domain` field is not a string.
    #[error("{file} has a \"domain\" field that is not a string")]
    InvalidDomain { file: String },

    /// A legacy line is not valid base64.
    #[error("Error on line {line}: {source}")]
    Base64 {
        line: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// A legacy line decoded to bytes that are not UTF-8.
    #[error("Error on line {line}: decoded bytes are not valid UTF-8")]
    InvalidUtf8 { line: usize },

    /// A legacy line decoded to text that is not JSON.
    #[error("Error on line {line}: {source}")]
    InvalidLineJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingDomain { file } => format!(
                "{} has a \"conf\" entry but no \"domain\".\n   Add a \"domain\" such as \"https://example.com\" or remove \"conf\".",
                file
            ),
            AppError::InvalidDomain { file } => format!(
                "{} has a non-string \"domain\".\n   Use a URL string such as \"https://example.com/\".",
                file
            ),
            AppError::Io { path, source } => {
                if source.kind() == std::io::ErrorKind::PermissionDenied {
                    format!(
                        "Permission denied: {}\n   Check the file permissions of the output location.",
                        path.display()
                    )
                } else if source.kind() == std::io::ErrorKind::NotFound {
                    format!(
                        "Not found: {}\n   Check that the path exists and the parent folder is present.",
                        path.display()
                    )
                } else {
                    self.to_string()
                }
            }
            AppError::ConfigError(msg) => {
                format!("Configuration error: {}\n   Check sitepack.toml or the --config path.", msg)
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is contained to a single input and the run
    /// may continue with the next file or line.
    ///
    /// I/O errors count as fatal here since output writes produce them too.
    /// The loader and formatter contain their own read failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepack_core::error::AppError;
    ///
    /// let err = AppError::NotAnObject { path: "list.json".into() };
    /// assert!(err.is_skippable());
    ///
    /// let err = AppError::MissingDomain { file: "a.json".to_string() };
    /// assert!(!err.is_skippable());
    /// ```
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            AppError::Undecodable { .. }
                | AppError::InvalidJson { .. }
                | AppError::NotAnObject { .. }
                | AppError::Base64 { .. }
                | AppError::InvalidUtf8 { .. }
                | AppError::InvalidLineJson { .. }
        )
    }
}
