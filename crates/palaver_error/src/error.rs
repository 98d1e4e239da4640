//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, ValidationError};

/// Every error condition a Palaver operation can raise.
///
/// # Examples
///
/// ```
/// use palaver_error::{PalaverError, ConfigError, ConfigErrorKind};
///
/// let config_err = ConfigError::new(ConfigErrorKind::Parse("missing field".to_string()));
/// let err: PalaverError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PalaverErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Invalid input value
    #[from(ValidationError)]
    Validation(ValidationError),
    /// A result could not be rendered for output
    #[display("Output error: {}", _0)]
    Output(#[error(ignore)] String),
}

/// Palaver error with kind discrimination.
///
/// # Examples
///
/// ```
/// use palaver_error::{PalaverErrorKind, PalaverResult, DatabaseError, DatabaseErrorKind};
///
/// fn might_fail() -> PalaverResult<()> {
///     Err(DatabaseError::new(DatabaseErrorKind::NotFound))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), PalaverErrorKind::Database(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Palaver Error: {}", _0)]
pub struct PalaverError(Box<PalaverErrorKind>);

impl PalaverError {
    /// Create a new error from a kind.
    pub fn new(kind: PalaverErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PalaverErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to PalaverErrorKind
impl<T> From<T> for PalaverError
where
    T: Into<PalaverErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Palaver operations.
pub type PalaverResult<T> = std::result::Result<T, PalaverError>;
