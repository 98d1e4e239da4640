//! Chat persistence for Gemini-backed chat applications.
//!
//! Palaver stores chat sessions, the messages inside them, and metadata for
//! files users upload alongside messages. Files mirrored to the Gemini Files
//! API carry an expiry deadline so callers never reference a remote copy
//! that has already been deleted.
//!
//! # Example
//!
//! ```
//! use palaver::{ChatRepository, InMemoryChatRepository, NewChat, NewFileMetadata, NewMessage,
//!     ProcessingMethod, Role};
//!
//! # fn main() -> palaver::PalaverResult<()> {
//! let mut repo = InMemoryChatRepository::new();
//! let chat = repo.create_chat(NewChat::new().with_title("Receipts"))?;
//! let message = repo.add_message(NewMessage::new(chat.id, Role::User, "Total this up"))?;
//! let file = repo.create_file(
//!     NewFileMetadata::with_generated_id("/uploads/receipt.png", ProcessingMethod::Inline),
//! )?;
//! repo.attach_file(message.id, &file.id)?;
//!
//! let conversation = repo.load_conversation(chat.id)?.unwrap();
//! assert_eq!(conversation.messages[0].files.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{LogFormat, LoggingConfig, PalaverConfig};

pub use palaver_core::{
    Chat, Conversation, DEFAULT_CHAT_TITLE, FILES_API_EXPIRY_OFFSET_MINUTES, FileMetadata,
    Message, MessageWithFiles, NewChat, NewFileMetadata, NewMessage, ProcessingMethod, Role,
    files_api_expiry,
};
pub use palaver_error::{
    ConfigError, ConfigErrorKind, DatabaseError, DatabaseErrorKind, DatabaseResult, PalaverError,
    PalaverErrorKind, PalaverResult, ValidationError, ValidationErrorKind,
};
pub use palaver_interface::{ChatRepository, InMemoryChatRepository};

#[cfg(feature = "database")]
pub use palaver_database::{
    DatabaseConfig, PgPool, PgPooledConnection, PostgresChatRepository, connect, create_pool,
    establish_connection, run_migrations,
};

// Re-export diesel's connection type for callers holding their own connections
#[cfg(feature = "database")]
pub use diesel::pg::PgConnection;
