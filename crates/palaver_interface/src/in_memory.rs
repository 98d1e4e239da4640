//! In-memory implementation of ChatRepository.
//!
//! Keeps every record in ordered maps and enforces the constraints that the
//! PostgreSQL schema enforces: foreign keys, the unique disk path, cascading
//! chat deletion and link cleanup. All data is lost when the repository is
//! dropped.

use crate::ChatRepository;
use chrono::{DateTime, Utc};
use palaver_core::{Chat, FileMetadata, Message, NewChat, NewFileMetadata, NewMessage};
use palaver_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// In-memory chat repository.
///
/// # Example
/// ```
/// use palaver_core::{NewChat, NewMessage, Role};
/// use palaver_interface::{ChatRepository, InMemoryChatRepository};
///
/// let mut repo = InMemoryChatRepository::new();
/// let chat = repo.create_chat(NewChat::new()).unwrap();
/// repo.add_message(NewMessage::new(chat.id, Role::User, "Hi")).unwrap();
/// assert_eq!(repo.list_messages(chat.id).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    chats: BTreeMap<i32, Chat>,
    messages: BTreeMap<i32, Message>,
    files: BTreeMap<String, FileMetadata>,
    /// (message_id, file_metadata_id) pairs
    links: BTreeSet<(i32, String)>,
    last_chat_id: i32,
    last_message_id: i32,
}

impl InMemoryChatRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages across all chats (for testing).
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Number of stored message/file links (for testing).
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    fn file_mut(&mut self, id: &str) -> DatabaseResult<&mut FileMetadata> {
        self.files
            .get_mut(id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))
    }

    fn sorted_messages<'a>(messages: impl Iterator<Item = &'a Message>) -> Vec<Message> {
        let mut messages: Vec<Message> = messages.cloned().collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        messages
    }
}

fn limit_to_len(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

impl ChatRepository for InMemoryChatRepository {
    fn create_chat(&mut self, new_chat: NewChat) -> DatabaseResult<Chat> {
        self.last_chat_id += 1;
        let chat = Chat {
            id: self.last_chat_id,
            title: new_chat.title,
            create_time: new_chat.create_time,
        };
        debug!(chat_id = chat.id, "Created chat");
        self.chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    fn get_chat(&mut self, id: i32) -> DatabaseResult<Option<Chat>> {
        Ok(self.chats.get(&id).cloned())
    }

    fn list_chats(&mut self, limit: i64) -> DatabaseResult<Vec<Chat>> {
        let mut chats: Vec<Chat> = self.chats.values().cloned().collect();
        chats.sort_by(|a, b| b.create_time.cmp(&a.create_time).then(b.id.cmp(&a.id)));
        chats.truncate(limit_to_len(limit));
        Ok(chats)
    }

    fn rename_chat(&mut self, id: i32, title: &str) -> DatabaseResult<Chat> {
        let chat = self
            .chats
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
        chat.title = title.to_string();
        Ok(chat.clone())
    }

    fn delete_chat(&mut self, id: i32) -> DatabaseResult<bool> {
        if self.chats.remove(&id).is_none() {
            return Ok(false);
        }

        let doomed: BTreeSet<i32> = self
            .messages
            .values()
            .filter(|m| m.chat_id == id)
            .map(|m| m.id)
            .collect();
        self.messages.retain(|message_id, _| !doomed.contains(message_id));
        self.links.retain(|(message_id, _)| !doomed.contains(message_id));

        debug!(chat_id = id, messages = doomed.len(), "Deleted chat");
        Ok(true)
    }

    fn add_message(&mut self, new_message: NewMessage) -> DatabaseResult<Message> {
        if !self.chats.contains_key(&new_message.chat_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation(
                format!("chat {} does not exist", new_message.chat_id),
            )));
        }

        self.last_message_id += 1;
        let message = Message {
            id: self.last_message_id,
            chat_id: new_message.chat_id,
            role: new_message.role,
            content: new_message.content,
            timestamp: new_message.timestamp,
        };
        debug!(
            message_id = message.id,
            chat_id = message.chat_id,
            role = %message.role,
            "Added message"
        );
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    fn get_message(&mut self, id: i32) -> DatabaseResult<Option<Message>> {
        Ok(self.messages.get(&id).cloned())
    }

    fn list_messages(&mut self, chat_id: i32) -> DatabaseResult<Vec<Message>> {
        Ok(Self::sorted_messages(
            self.messages.values().filter(|m| m.chat_id == chat_id),
        ))
    }

    fn update_message_content(&mut self, id: i32, content: &str) -> DatabaseResult<Message> {
        let message = self
            .messages
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
        message.content = content.to_string();
        Ok(message.clone())
    }

    fn delete_message(&mut self, id: i32) -> DatabaseResult<bool> {
        if self.messages.remove(&id).is_none() {
            return Ok(false);
        }
        self.links.retain(|(message_id, _)| *message_id != id);
        Ok(true)
    }

    fn create_file(&mut self, new_file: NewFileMetadata) -> DatabaseResult<FileMetadata> {
        if self.files.contains_key(&new_file.id) {
            return Err(DatabaseError::new(DatabaseErrorKind::UniqueViolation(
                format!("file id {} already exists", new_file.id),
            )));
        }
        if self
            .files
            .values()
            .any(|f| f.local_disk_path == new_file.local_disk_path)
        {
            return Err(DatabaseError::new(DatabaseErrorKind::UniqueViolation(
                format!("local_disk_path {} already exists", new_file.local_disk_path),
            )));
        }

        let file = FileMetadata::from(new_file);
        debug!(file_id = %file.id, method = %file.processing_method, "Created file metadata");
        self.files.insert(file.id.clone(), file.clone());
        Ok(file)
    }

    fn get_file(&mut self, id: &str) -> DatabaseResult<Option<FileMetadata>> {
        Ok(self.files.get(id).cloned())
    }

    fn find_file_by_path(&mut self, local_disk_path: &str) -> DatabaseResult<Option<FileMetadata>> {
        Ok(self
            .files
            .values()
            .find(|f| f.local_disk_path == local_disk_path)
            .cloned())
    }

    fn list_files(&mut self, limit: i64) -> DatabaseResult<Vec<FileMetadata>> {
        let mut files: Vec<FileMetadata> = self.files.values().cloned().collect();
        files.sort_by(|a, b| {
            b.upload_timestamp
                .cmp(&a.upload_timestamp)
                .then(a.id.cmp(&b.id))
        });
        files.truncate(limit_to_len(limit));
        Ok(files)
    }

    fn record_files_api_upload(
        &mut self,
        id: &str,
        gemini_file_id: &str,
        uploaded_at: DateTime<Utc>,
    ) -> DatabaseResult<FileMetadata> {
        let file = self.file_mut(id)?;
        file.record_files_api_upload(gemini_file_id, uploaded_at);
        debug!(
            file_id = id,
            gemini_file_id,
            expires_at = ?file.gemini_api_expiry_timestamp,
            "Recorded Files API upload"
        );
        Ok(file.clone())
    }

    fn clear_files_api_upload(&mut self, id: &str) -> DatabaseResult<FileMetadata> {
        let file = self.file_mut(id)?;
        file.clear_files_api_upload();
        Ok(file.clone())
    }

    fn list_expired_files_api_uploads(
        &mut self,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Vec<FileMetadata>> {
        let mut expired: Vec<FileMetadata> = self
            .files
            .values()
            .filter(|f| f.is_files_api_expired(now))
            .cloned()
            .collect();
        expired.sort_by(|a, b| {
            a.gemini_api_expiry_timestamp
                .cmp(&b.gemini_api_expiry_timestamp)
                .then(a.id.cmp(&b.id))
        });
        Ok(expired)
    }

    fn delete_file(&mut self, id: &str) -> DatabaseResult<bool> {
        if self.files.remove(id).is_none() {
            return Ok(false);
        }
        self.links.retain(|(_, file_id)| file_id != id);
        Ok(true)
    }

    fn attach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<()> {
        if !self.messages.contains_key(&message_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation(
                format!("message {} does not exist", message_id),
            )));
        }
        if !self.files.contains_key(file_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation(
                format!("file {} does not exist", file_id),
            )));
        }
        self.links.insert((message_id, file_id.to_string()));
        Ok(())
    }

    fn detach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<bool> {
        Ok(self.links.remove(&(message_id, file_id.to_string())))
    }

    fn files_for_message(&mut self, message_id: i32) -> DatabaseResult<Vec<FileMetadata>> {
        let mut files: Vec<FileMetadata> = self
            .links
            .iter()
            .filter(|(linked_message, _)| *linked_message == message_id)
            .filter_map(|(_, file_id)| self.files.get(file_id).cloned())
            .collect();
        files.sort_by(|a, b| {
            a.upload_timestamp
                .cmp(&b.upload_timestamp)
                .then(a.id.cmp(&b.id))
        });
        Ok(files)
    }

    fn messages_for_file(&mut self, file_id: &str) -> DatabaseResult<Vec<Message>> {
        Ok(Self::sorted_messages(
            self.links
                .iter()
                .filter(|(_, linked_file)| linked_file == file_id)
                .filter_map(|(message_id, _)| self.messages.get(message_id)),
        ))
    }
}
