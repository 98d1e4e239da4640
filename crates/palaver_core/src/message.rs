//! Message types for conversation history.

use crate::Role;
use chrono::{DateTime, Utc};
use palaver_error::ValidationError;
use serde::{Deserialize, Serialize};

/// One stored turn in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Storage-assigned identifier
    pub id: i32,
    /// Owning chat
    pub chat_id: i32,
    /// Author of the turn
    pub role: Role,
    /// Message text
    pub content: String,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
}

/// A message that has not been stored yet.
///
/// # Examples
///
/// ```
/// use palaver_core::{NewMessage, Role};
///
/// let message = NewMessage::new(1, Role::User, "Hello!");
/// assert_eq!(message.role, Role::User);
///
/// assert!(NewMessage::parse(1, "admin", "Hello!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Owning chat
    pub chat_id: i32,
    /// Author of the turn
    pub role: Role,
    /// Message text
    pub content: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
}

impl NewMessage {
    /// Create a message stamped with the current instant.
    pub fn new<S: Into<String>>(chat_id: i32, role: Role, content: S) -> Self {
        Self {
            chat_id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a message from an unvalidated role string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRole` if `role` is not one of user, model, assistant.
    pub fn parse<S: Into<String>>(
        chat_id: i32,
        role: &str,
        content: S,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(chat_id, role.parse()?, content))
    }

    /// Override the creation instant.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
