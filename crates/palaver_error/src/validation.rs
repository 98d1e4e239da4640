//! Validation errors raised while turning raw input into domain values.

/// Validation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Message role outside of user/model/assistant
    #[display("Invalid message role '{}': expected one of user, model, assistant", _0)]
    InvalidRole(String),
    /// Processing method outside of inline/files_api
    #[display("Invalid processing method '{}': expected inline or files_api", _0)]
    InvalidProcessingMethod(String),
    /// Timestamp that could not be parsed
    #[display("Invalid timestamp '{}'", _0)]
    InvalidTimestamp(String),
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use palaver_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::InvalidRole("admin".to_string()));
/// assert!(format!("{}", err).contains("admin"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
