//! Repository trait for chat persistence.

use chrono::{DateTime, Utc};
use palaver_core::{
    Chat, Conversation, FileMetadata, Message, MessageWithFiles, NewChat, NewFileMetadata,
    NewMessage,
};
use palaver_error::DatabaseResult;

/// Storage operations for chats, messages, files and their links.
///
/// Implementations must uphold the schema constraints:
/// - deleting a chat removes its messages
/// - deleting a message or a file removes only its link rows
/// - `local_disk_path` is unique across files
/// - a stored Files API expiry always equals upload + 47h55m
pub trait ChatRepository {
    /// Store a new chat.
    fn create_chat(&mut self, new_chat: NewChat) -> DatabaseResult<Chat>;

    /// Get a chat by id.
    fn get_chat(&mut self, id: i32) -> DatabaseResult<Option<Chat>>;

    /// List chats, newest first.
    fn list_chats(&mut self, limit: i64) -> DatabaseResult<Vec<Chat>>;

    /// Change a chat's title.
    ///
    /// # Errors
    /// Returns `NotFound` if the chat does not exist.
    fn rename_chat(&mut self, id: i32, title: &str) -> DatabaseResult<Chat>;

    /// Delete a chat and all of its messages.
    ///
    /// Returns false if no such chat existed.
    fn delete_chat(&mut self, id: i32) -> DatabaseResult<bool>;

    /// Store a new message.
    ///
    /// # Errors
    /// Returns `ForeignKeyViolation` if the chat does not exist.
    fn add_message(&mut self, new_message: NewMessage) -> DatabaseResult<Message>;

    /// Get a message by id.
    fn get_message(&mut self, id: i32) -> DatabaseResult<Option<Message>>;

    /// List a chat's messages in chronological order.
    fn list_messages(&mut self, chat_id: i32) -> DatabaseResult<Vec<Message>>;

    /// Replace a message's text.
    ///
    /// # Errors
    /// Returns `NotFound` if the message does not exist.
    fn update_message_content(&mut self, id: i32, content: &str) -> DatabaseResult<Message>;

    /// Delete a message. Attached files are kept.
    fn delete_message(&mut self, id: i32) -> DatabaseResult<bool>;

    /// Store metadata for an uploaded file.
    ///
    /// # Errors
    /// Returns `UniqueViolation` if the id or `local_disk_path` is taken.
    fn create_file(&mut self, new_file: NewFileMetadata) -> DatabaseResult<FileMetadata>;

    /// Get file metadata by id.
    fn get_file(&mut self, id: &str) -> DatabaseResult<Option<FileMetadata>>;

    /// Get file metadata by its local disk path.
    fn find_file_by_path(&mut self, local_disk_path: &str) -> DatabaseResult<Option<FileMetadata>>;

    /// List files, most recently received first.
    fn list_files(&mut self, limit: i64) -> DatabaseResult<Vec<FileMetadata>>;

    /// Record a Files API upload and derive its expiry.
    ///
    /// # Errors
    /// Returns `NotFound` if the file does not exist.
    fn record_files_api_upload(
        &mut self,
        id: &str,
        gemini_file_id: &str,
        uploaded_at: DateTime<Utc>,
    ) -> DatabaseResult<FileMetadata>;

    /// Unset all Files API fields of a file.
    ///
    /// # Errors
    /// Returns `NotFound` if the file does not exist.
    fn clear_files_api_upload(&mut self, id: &str) -> DatabaseResult<FileMetadata>;

    /// Files whose Files API copy has expired by `now`, soonest expiry first.
    fn list_expired_files_api_uploads(
        &mut self,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Vec<FileMetadata>>;

    /// Delete file metadata. Messages that referenced it are kept.
    fn delete_file(&mut self, id: &str) -> DatabaseResult<bool>;

    /// Attach a file to a message. Attaching the same pair twice is a no-op.
    ///
    /// # Errors
    /// Returns `ForeignKeyViolation` if either side does not exist.
    fn attach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<()>;

    /// Remove a file from a message. Returns false if they were not linked.
    fn detach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<bool>;

    /// Files attached to a message, oldest upload first.
    fn files_for_message(&mut self, message_id: i32) -> DatabaseResult<Vec<FileMetadata>>;

    /// Messages a file is attached to, in chronological order.
    fn messages_for_file(&mut self, file_id: &str) -> DatabaseResult<Vec<Message>>;

    /// Load a chat with its messages and their attachments.
    ///
    /// The provided implementation issues one lookup per message; backends
    /// that can batch the attachment query should override it.
    fn load_conversation(&mut self, chat_id: i32) -> DatabaseResult<Option<Conversation>> {
        let Some(chat) = self.get_chat(chat_id)? else {
            return Ok(None);
        };

        let mut messages = Vec::new();
        for message in self.list_messages(chat_id)? {
            let files = self.files_for_message(message.id)?;
            messages.push(MessageWithFiles { message, files });
        }

        Ok(Some(Conversation { chat, messages }))
    }
}
