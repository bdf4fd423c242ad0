//! Error types for ragdesk.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=empty, 4=validation, 7=config, 8=io, 9=provider)
//! - Retryability flags for callers deciding whether to try again
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Provider failures are recovered inside the retriever and never surface
//! to a chat consumer; the CLI is the only place they reach a human.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ragdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not found / empty (exit 3)
    IndexEmpty,
    UnknownCategory,

    // Validation (exit 4)
    InvalidArgument,
    EmptyInput,

    // Config (exit 7)
    ConfigError,
    MissingApiKey,

    // I/O (exit 8)
    IoError,
    JsonError,
    IndexFileError,

    // Provider (exit 9)
    ProviderError,
    ProviderTimeout,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::IndexEmpty => "INDEX_EMPTY",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::IndexFileError => "INDEX_FILE_ERROR",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::ProviderTimeout => "PROVIDER_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::IndexEmpty | Self::UnknownCategory => 3,
            Self::InvalidArgument | Self::EmptyInput => 4,
            Self::ConfigError | Self::MissingApiKey => 7,
            Self::IoError | Self::JsonError | Self::IndexFileError => 8,
            Self::ProviderError | Self::ProviderTimeout => 9,
        }
    }

    /// Whether the same call may succeed if simply issued again.
    ///
    /// Only transient upstream conditions qualify. The library itself never
    /// retries; this flag is advice for the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderError | Self::ProviderTimeout)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in ragdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Embedding call failed: transport, non-2xx status, or malformed body.
    #[error("Embedding provider error: {0}")]
    Provider(String),

    #[error("Embedding provider did not answer within {secs}s")]
    ProviderTimeout { secs: u64 },

    #[error("Nothing to embed: text is empty after truncation")]
    EmptyInput,

    #[error("No embedding API key configured")]
    MissingApiKey,

    #[error("Vector index is empty")]
    IndexEmpty,

    #[error("Index file {path}: {message}")]
    IndexFile { path: PathBuf, message: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Provider(_) => ErrorCode::ProviderError,
            Self::ProviderTimeout { .. } => ErrorCode::ProviderTimeout,
            Self::EmptyInput => ErrorCode::EmptyInput,
            Self::MissingApiKey => ErrorCode::MissingApiKey,
            Self::IndexEmpty => ErrorCode::IndexEmpty,
            Self::IndexFile { .. } => ErrorCode::IndexFileError,
            Self::UnknownCategory(_) => ErrorCode::UnknownCategory,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingApiKey => Some(
                "Set GEMINI_API_KEY, or run `ragdesk config set --api-key <KEY>`".to_string(),
            ),

            Self::ProviderTimeout { .. } => Some(
                "Raise RAGDESK_EMBED_TIMEOUT_SECS or check connectivity to the embedding endpoint"
                    .to_string(),
            ),

            Self::IndexEmpty => Some(
                "No chunk could be embedded. Run `ragdesk embeddings test \"hello\"` to check the provider, then `ragdesk index build`."
                    .to_string(),
            ),

            Self::IndexFile { path, .. } => Some(format!(
                "Regenerate the file with `ragdesk index build --output {}`",
                path.display()
            )),

            Self::UnknownCategory(_) => Some(
                "Valid categories: vacation, remote-work, transport-allowance, health-allowance, \
                 compensatory-leave, attendance, governance"
                    .to_string(),
            ),

            Self::EmptyInput => Some("Provide a non-empty query".to_string()),

            Self::Provider(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_are_retryable() {
        assert!(Error::Provider("boom".into()).error_code().is_retryable());
        assert!(Error::ProviderTimeout { secs: 5 }.error_code().is_retryable());
        assert!(!Error::EmptyInput.error_code().is_retryable());
    }

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::Provider("x".into()).exit_code(), 9);
        assert_eq!(Error::MissingApiKey.exit_code(), 7);
        assert_eq!(Error::UnknownCategory("x".into()).exit_code(), 3);
        assert_eq!(Error::InvalidArgument("x".into()).exit_code(), 4);
        assert_eq!(Error::Other("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let json = Error::MissingApiKey.to_structured_json();
        assert_eq!(json["error"]["code"], "MISSING_API_KEY");
        assert_eq!(json["error"]["exit_code"], 7);
        assert!(json["error"]["hint"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_structured_json_without_hint() {
        let json = Error::Provider("503".into()).to_structured_json();
        assert_eq!(json["error"]["retryable"], true);
        assert!(json["error"].get("hint").is_none());
    }
}
