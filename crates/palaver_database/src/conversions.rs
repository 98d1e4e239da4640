//! Conversions between domain types and database rows.

use crate::{
    ChatRow, FileMetadataRow, FilesApiUploadChangeset, MessageRow, NewChatRow,
    NewFileMetadataRow, NewMessageRow,
};
use chrono::{DateTime, Utc};
use palaver_core::{
    Chat, FileMetadata, Message, NewChat, NewFileMetadata, NewMessage, ProcessingMethod,
    files_api_expiry,
};
use palaver_error::{DatabaseError, DatabaseErrorKind};

impl From<NewChat> for NewChatRow {
    fn from(chat: NewChat) -> Self {
        Self {
            title: chat.title,
            create_time: chat.create_time,
        }
    }
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            create_time: row.create_time,
        }
    }
}

impl From<NewMessage> for NewMessageRow {
    fn from(message: NewMessage) -> Self {
        Self {
            chat_id: message.chat_id,
            role: message.role.as_str().to_string(),
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = DatabaseError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "message {}: {}",
                row.id, e
            )))
        })?;

        Ok(Self {
            id: row.id,
            chat_id: row.chat_id,
            role,
            content: row.content,
            timestamp: row.timestamp,
        })
    }
}

impl From<NewFileMetadata> for NewFileMetadataRow {
    fn from(mut file: NewFileMetadata) -> Self {
        file.normalize_gemini_expiry();
        Self {
            id: file.id,
            original_filename: file.original_filename,
            content_type: file.content_type,
            size: file.size,
            local_disk_path: file.local_disk_path,
            upload_timestamp: file.upload_timestamp,
            processing_method: file.processing_method.as_str().to_string(),
            gemini_api_file_id: file.gemini_api_file_id,
            gemini_api_upload_timestamp: file.gemini_api_upload_timestamp,
            gemini_api_expiry_timestamp: file.gemini_api_expiry_timestamp,
        }
    }
}

impl TryFrom<FileMetadataRow> for FileMetadata {
    type Error = DatabaseError;

    fn try_from(row: FileMetadataRow) -> Result<Self, Self::Error> {
        let processing_method: ProcessingMethod = row.processing_method.parse().map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "file {}: {}",
                row.id, e
            )))
        })?;

        Ok(Self {
            id: row.id,
            original_filename: row.original_filename,
            content_type: row.content_type,
            size: row.size,
            local_disk_path: row.local_disk_path,
            upload_timestamp: row.upload_timestamp,
            processing_method,
            gemini_api_file_id: row.gemini_api_file_id,
            gemini_api_upload_timestamp: row.gemini_api_upload_timestamp,
            gemini_api_expiry_timestamp: row.gemini_api_expiry_timestamp,
        })
    }
}

impl FilesApiUploadChangeset {
    /// Changes for a file uploaded to the Files API at `uploaded_at`.
    pub fn uploaded(gemini_file_id: &str, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            processing_method: ProcessingMethod::FilesApi.as_str().to_string(),
            gemini_api_file_id: Some(gemini_file_id.to_string()),
            gemini_api_upload_timestamp: Some(uploaded_at),
            gemini_api_expiry_timestamp: Some(files_api_expiry(uploaded_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use palaver_core::Role;

    fn message_row(role: &str) -> MessageRow {
        MessageRow {
            id: 7,
            chat_id: 1,
            role: role.to_string(),
            content: "hello".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn message_row_with_valid_role_converts() {
        let message = Message::try_from(message_row("model")).unwrap();
        assert_eq!(message.role, Role::Model);
    }

    #[test]
    fn message_row_with_unknown_role_is_serialization_error() {
        let err = Message::try_from(message_row("admin")).unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    }

    #[test]
    fn new_file_row_carries_derived_expiry() {
        let uploaded = Utc.with_ymd_and_hms(2025, 7, 4, 18, 0, 0).unwrap();
        let mut file = NewFileMetadata::new("f", "/uploads/f", ProcessingMethod::FilesApi);
        file.gemini_api_upload_timestamp = Some(uploaded);

        let row = NewFileMetadataRow::from(file);
        assert_eq!(row.processing_method, "files_api");
        assert_eq!(row.gemini_api_expiry_timestamp, Some(files_api_expiry(uploaded)));
    }

    #[test]
    fn new_file_row_drops_expiry_without_upload() {
        let mut file = NewFileMetadata::new("f", "/uploads/f", ProcessingMethod::Inline);
        file.gemini_api_expiry_timestamp = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

        let row = NewFileMetadataRow::from(file);
        assert!(row.gemini_api_upload_timestamp.is_none());
        assert!(row.gemini_api_expiry_timestamp.is_none());
    }

    #[test]
    fn upload_changeset_switches_method() {
        let uploaded = Utc.with_ymd_and_hms(2025, 7, 4, 18, 0, 0).unwrap();
        let changes = FilesApiUploadChangeset::uploaded("files/xyz", uploaded);
        assert_eq!(changes.processing_method, "files_api");
        assert_eq!(changes.gemini_api_expiry_timestamp, Some(files_api_expiry(uploaded)));
    }
}
