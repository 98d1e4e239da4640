//! Chat sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to chats created without one.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// A stored conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Storage-assigned identifier
    pub id: i32,
    /// Display title
    pub title: String,
    /// When the chat was created
    pub create_time: DateTime<Utc>,
}

/// A chat that has not been stored yet.
///
/// Defaults are assigned here rather than by the storage engine.
///
/// # Examples
///
/// ```
/// use palaver_core::{NewChat, DEFAULT_CHAT_TITLE};
///
/// let chat = NewChat::new();
/// assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
///
/// let named = NewChat::new().with_title("Trip planning");
/// assert_eq!(named.title, "Trip planning");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChat {
    /// Display title
    pub title: String,
    /// Creation instant
    pub create_time: DateTime<Utc>,
}

impl NewChat {
    /// Create a chat titled "New Chat", stamped with the current instant.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_CHAT_TITLE.to_string(),
            create_time: Utc::now(),
        }
    }

    /// Replace the title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    /// Override the creation instant.
    pub fn with_create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = create_time;
        self
    }
}

impl Default for NewChat {
    fn default() -> Self {
        Self::new()
    }
}
