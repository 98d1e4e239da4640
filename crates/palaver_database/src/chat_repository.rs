//! PostgreSQL implementation of ChatRepository.

use crate::schema::{chats, file_metadata, message_file_link, messages};
use crate::{
    ChatRow, FileMetadataRow, FilesApiUploadChangeset, MessageFileLinkRow, MessageRow, NewChatRow,
    NewFileMetadataRow, NewMessageRow,
};
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use palaver_core::{
    Chat, Conversation, FileMetadata, Message, MessageWithFiles, NewChat, NewFileMetadata,
    NewMessage,
};
use palaver_error::DatabaseResult;
use palaver_interface::ChatRepository;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// PostgreSQL implementation of ChatRepository.
///
/// Uses a mutable reference to PgConnection. For concurrent access, check a
/// connection out of a [`crate::PgPool`] per unit of work.
///
/// Cascades and constraint checks are done by the schema: deleting a chat
/// removes its messages, and deleting a message or a file removes its link rows.
pub struct PostgresChatRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresChatRepository<'a> {
    /// Create a new repository with a mutable connection reference.
    ///
    /// # Example
    /// ```no_run
    /// use palaver_database::{PostgresChatRepository, establish_connection};
    /// use palaver_interface::ChatRepository;
    /// use palaver_core::NewChat;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut conn = establish_connection()?;
    /// let mut repo = PostgresChatRepository::new(&mut conn);
    /// let chat = repo.create_chat(NewChat::new())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

fn into_messages(rows: Vec<MessageRow>) -> DatabaseResult<Vec<Message>> {
    rows.into_iter().map(Message::try_from).collect()
}

fn into_files(rows: Vec<FileMetadataRow>) -> DatabaseResult<Vec<FileMetadata>> {
    rows.into_iter().map(FileMetadata::try_from).collect()
}

impl ChatRepository for PostgresChatRepository<'_> {
    fn create_chat(&mut self, new_chat: NewChat) -> DatabaseResult<Chat> {
        let row: ChatRow = diesel::insert_into(chats::table)
            .values(&NewChatRow::from(new_chat))
            .returning(ChatRow::as_returning())
            .get_result(self.conn)?;

        debug!(chat_id = row.id, "Created chat");
        Ok(row.into())
    }

    fn get_chat(&mut self, id: i32) -> DatabaseResult<Option<Chat>> {
        let row: Option<ChatRow> = chats::table
            .find(id)
            .select(ChatRow::as_select())
            .first::<ChatRow>(self.conn)
            .optional()?;

        Ok(row.map(Chat::from))
    }

    fn list_chats(&mut self, limit: i64) -> DatabaseResult<Vec<Chat>> {
        let rows: Vec<ChatRow> = chats::table
            .order((chats::create_time.desc(), chats::id.desc()))
            .limit(limit.max(0))
            .select(ChatRow::as_select())
            .load(self.conn)?;

        Ok(rows.into_iter().map(Chat::from).collect())
    }

    fn rename_chat(&mut self, id: i32, title: &str) -> DatabaseResult<Chat> {
        let row: ChatRow = diesel::update(chats::table.find(id))
            .set(chats::title.eq(title))
            .returning(ChatRow::as_returning())
            .get_result(self.conn)?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(chat_id = id))]
    fn delete_chat(&mut self, id: i32) -> DatabaseResult<bool> {
        let deleted = diesel::delete(chats::table.find(id)).execute(self.conn)?;
        debug!(deleted, "Deleted chat with cascading messages");
        Ok(deleted > 0)
    }

    #[instrument(
        skip(self, new_message),
        fields(chat_id = new_message.chat_id, role = %new_message.role)
    )]
    fn add_message(&mut self, new_message: NewMessage) -> DatabaseResult<Message> {
        let row: MessageRow = diesel::insert_into(messages::table)
            .values(&NewMessageRow::from(new_message))
            .returning(MessageRow::as_returning())
            .get_result(self.conn)?;

        debug!(message_id = row.id, "Added message");
        Message::try_from(row)
    }

    fn get_message(&mut self, id: i32) -> DatabaseResult<Option<Message>> {
        messages::table
            .find(id)
            .select(MessageRow::as_select())
            .first::<MessageRow>(self.conn)
            .optional()?
            .map(Message::try_from)
            .transpose()
    }

    fn list_messages(&mut self, chat_id: i32) -> DatabaseResult<Vec<Message>> {
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::chat_id.eq(chat_id))
            .order((messages::timestamp.asc(), messages::id.asc()))
            .select(MessageRow::as_select())
            .load(self.conn)?;

        into_messages(rows)
    }

    fn update_message_content(&mut self, id: i32, content: &str) -> DatabaseResult<Message> {
        let row: MessageRow = diesel::update(messages::table.find(id))
            .set(messages::content.eq(content))
            .returning(MessageRow::as_returning())
            .get_result(self.conn)?;

        Message::try_from(row)
    }

    fn delete_message(&mut self, id: i32) -> DatabaseResult<bool> {
        let deleted = diesel::delete(messages::table.find(id)).execute(self.conn)?;
        Ok(deleted > 0)
    }

    #[instrument(
        skip(self, new_file),
        fields(file_id = %new_file.id, method = %new_file.processing_method)
    )]
    fn create_file(&mut self, new_file: NewFileMetadata) -> DatabaseResult<FileMetadata> {
        let row: FileMetadataRow = diesel::insert_into(file_metadata::table)
            .values(&NewFileMetadataRow::from(new_file))
            .returning(FileMetadataRow::as_returning())
            .get_result(self.conn)?;

        debug!(local_disk_path = %row.local_disk_path, "Created file metadata");
        FileMetadata::try_from(row)
    }

    fn get_file(&mut self, id: &str) -> DatabaseResult<Option<FileMetadata>> {
        file_metadata::table
            .find(id)
            .select(FileMetadataRow::as_select())
            .first::<FileMetadataRow>(self.conn)
            .optional()?
            .map(FileMetadata::try_from)
            .transpose()
    }

    fn find_file_by_path(&mut self, local_disk_path: &str) -> DatabaseResult<Option<FileMetadata>> {
        file_metadata::table
            .filter(file_metadata::local_disk_path.eq(local_disk_path))
            .select(FileMetadataRow::as_select())
            .first::<FileMetadataRow>(self.conn)
            .optional()?
            .map(FileMetadata::try_from)
            .transpose()
    }

    fn list_files(&mut self, limit: i64) -> DatabaseResult<Vec<FileMetadata>> {
        let rows: Vec<FileMetadataRow> = file_metadata::table
            .order((file_metadata::upload_timestamp.desc(), file_metadata::id.asc()))
            .limit(limit.max(0))
            .select(FileMetadataRow::as_select())
            .load(self.conn)?;

        into_files(rows)
    }

    #[instrument(skip(self), fields(file_id = id))]
    fn record_files_api_upload(
        &mut self,
        id: &str,
        gemini_file_id: &str,
        uploaded_at: DateTime<Utc>,
    ) -> DatabaseResult<FileMetadata> {
        let changes = FilesApiUploadChangeset::uploaded(gemini_file_id, uploaded_at);
        let row: FileMetadataRow = diesel::update(file_metadata::table.find(id))
            .set(&changes)
            .returning(FileMetadataRow::as_returning())
            .get_result(self.conn)?;

        debug!(expires_at = ?row.gemini_api_expiry_timestamp, "Recorded Files API upload");
        FileMetadata::try_from(row)
    }

    fn clear_files_api_upload(&mut self, id: &str) -> DatabaseResult<FileMetadata> {
        let row: FileMetadataRow = diesel::update(file_metadata::table.find(id))
            .set((
                file_metadata::gemini_api_file_id.eq(None::<String>),
                file_metadata::gemini_api_upload_timestamp.eq(None::<DateTime<Utc>>),
                file_metadata::gemini_api_expiry_timestamp.eq(None::<DateTime<Utc>>),
            ))
            .returning(FileMetadataRow::as_returning())
            .get_result(self.conn)?;

        FileMetadata::try_from(row)
    }

    fn list_expired_files_api_uploads(
        &mut self,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Vec<FileMetadata>> {
        let rows: Vec<FileMetadataRow> = file_metadata::table
            .filter(file_metadata::gemini_api_expiry_timestamp.le(now))
            .order((
                file_metadata::gemini_api_expiry_timestamp.asc(),
                file_metadata::id.asc(),
            ))
            .select(FileMetadataRow::as_select())
            .load(self.conn)?;

        into_files(rows)
    }

    fn delete_file(&mut self, id: &str) -> DatabaseResult<bool> {
        let deleted = diesel::delete(file_metadata::table.find(id)).execute(self.conn)?;
        Ok(deleted > 0)
    }

    fn attach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<()> {
        let link = MessageFileLinkRow {
            message_id,
            file_metadata_id: file_id.to_string(),
        };

        diesel::insert_into(message_file_link::table)
            .values(&link)
            .on_conflict_do_nothing()
            .execute(self.conn)?;

        Ok(())
    }

    fn detach_file(&mut self, message_id: i32, file_id: &str) -> DatabaseResult<bool> {
        let deleted = diesel::delete(
            message_file_link::table
                .filter(message_file_link::message_id.eq(message_id))
                .filter(message_file_link::file_metadata_id.eq(file_id)),
        )
        .execute(self.conn)?;

        Ok(deleted > 0)
    }

    fn files_for_message(&mut self, message_id: i32) -> DatabaseResult<Vec<FileMetadata>> {
        let rows: Vec<FileMetadataRow> = message_file_link::table
            .inner_join(file_metadata::table)
            .filter(message_file_link::message_id.eq(message_id))
            .order((file_metadata::upload_timestamp.asc(), file_metadata::id.asc()))
            .select(FileMetadataRow::as_select())
            .load(self.conn)?;

        into_files(rows)
    }

    fn messages_for_file(&mut self, file_id: &str) -> DatabaseResult<Vec<Message>> {
        let rows: Vec<MessageRow> = message_file_link::table
            .inner_join(messages::table)
            .filter(message_file_link::file_metadata_id.eq(file_id))
            .order((messages::timestamp.asc(), messages::id.asc()))
            .select(MessageRow::as_select())
            .load(self.conn)?;

        into_messages(rows)
    }

    #[instrument(skip(self))]
    fn load_conversation(&mut self, chat_id: i32) -> DatabaseResult<Option<Conversation>> {
        let Some(chat) = self.get_chat(chat_id)? else {
            return Ok(None);
        };
        let messages = self.list_messages(chat_id)?;
        let message_ids: Vec<i32> = messages.iter().map(|m| m.id).collect();

        let attachments: Vec<(i32, FileMetadataRow)> = message_file_link::table
            .inner_join(file_metadata::table)
            .filter(message_file_link::message_id.eq_any(message_ids))
            .order((file_metadata::upload_timestamp.asc(), file_metadata::id.asc()))
            .select((message_file_link::message_id, FileMetadataRow::as_select()))
            .load(self.conn)?;

        let mut files_by_message: HashMap<i32, Vec<FileMetadata>> = HashMap::new();
        for (message_id, row) in attachments {
            files_by_message
                .entry(message_id)
                .or_default()
                .push(FileMetadata::try_from(row)?);
        }

        debug!(
            messages = messages.len(),
            attachments = files_by_message.values().map(Vec::len).sum::<usize>(),
            "Loaded conversation"
        );

        let messages = messages
            .into_iter()
            .map(|message| {
                let files = files_by_message.remove(&message.id).unwrap_or_default();
                MessageWithFiles { message, files }
            })
            .collect();

        Ok(Some(Conversation { chat, messages }))
    }
}
