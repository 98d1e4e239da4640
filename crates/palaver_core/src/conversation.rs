//! A chat loaded together with its messages and their attachments.

use crate::{Chat, FileMetadata, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message paired with the files attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageWithFiles {
    /// The message itself
    pub message: Message,
    /// Attached files, oldest upload first
    pub files: Vec<FileMetadata>,
}

/// Full history of one chat, messages in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// The chat session
    pub chat: Chat,
    /// Messages with their attachments
    pub messages: Vec<MessageWithFiles>,
}

impl Conversation {
    /// Number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Attachments whose Files API copy has expired by `now`.
    ///
    /// Each file is reported once even if several messages reference it.
    pub fn expired_attachments(&self, now: DateTime<Utc>) -> Vec<&FileMetadata> {
        let mut expired: Vec<&FileMetadata> = Vec::new();
        for file in self.messages.iter().flat_map(|m| m.files.iter()) {
            if file.is_files_api_expired(now) && !expired.iter().any(|seen| seen.id == file.id) {
                expired.push(file);
            }
        }
        expired
    }
}
