//! Diesel row models for the chat tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Database row for the chats table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatRow {
    pub id: i32,
    pub title: String,
    pub create_time: DateTime<Utc>,
}

/// Insertable struct for creating a chat.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::chats)]
pub struct NewChatRow {
    pub title: String,
    pub create_time: DateTime<Utc>,
}

/// Database row for the messages table.
///
/// `role` stays a string here; the CHECK constraint guards it on write and
/// the conversion to [`palaver_core::Message`] guards it on read.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: i32,
    pub chat_id: i32,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Insertable struct for creating a message.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessageRow {
    pub chat_id: i32,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Database row for the file_metadata table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::file_metadata)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FileMetadataRow {
    pub id: String,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub local_disk_path: String,
    pub upload_timestamp: DateTime<Utc>,
    pub processing_method: String,
    pub gemini_api_file_id: Option<String>,
    pub gemini_api_upload_timestamp: Option<DateTime<Utc>>,
    pub gemini_api_expiry_timestamp: Option<DateTime<Utc>>,
}

/// Insertable struct for recording an upload.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::file_metadata)]
pub struct NewFileMetadataRow {
    pub id: String,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub local_disk_path: String,
    pub upload_timestamp: DateTime<Utc>,
    pub processing_method: String,
    pub gemini_api_file_id: Option<String>,
    pub gemini_api_upload_timestamp: Option<DateTime<Utc>>,
    pub gemini_api_expiry_timestamp: Option<DateTime<Utc>>,
}

/// Changeset applied when a file is pushed to the Files API.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::file_metadata)]
pub struct FilesApiUploadChangeset {
    pub processing_method: String,
    pub gemini_api_file_id: Option<String>,
    pub gemini_api_upload_timestamp: Option<DateTime<Utc>>,
    pub gemini_api_expiry_timestamp: Option<DateTime<Utc>>,
}

/// Row of the message_file_link table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::message_file_link)]
#[diesel(primary_key(message_id, file_metadata_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageFileLinkRow {
    pub message_id: i32,
    pub file_metadata_id: String,
}
