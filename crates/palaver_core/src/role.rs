//! Role types for message authors.

use palaver_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

/// Author of a message. The set is closed: storage rejects anything else.
///
/// # Examples
///
/// ```
/// use palaver_core::Role;
///
/// let role: Role = "assistant".parse().unwrap();
/// assert_eq!(role, Role::Assistant);
/// assert_eq!(format!("{}", Role::Model), "model");
/// assert!("admin".parse::<Role>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Messages typed by the human
    #[display("user")]
    User,
    /// Replies produced by the Gemini model
    #[display("model")]
    Model,
    /// Replies produced by any other assistant backend
    #[display("assistant")]
    Assistant,
}

impl Role {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            "assistant" => Ok(Role::Assistant),
            _ => Err(ValidationError::new(ValidationErrorKind::InvalidRole(
                s.to_string(),
            ))),
        }
    }
}
