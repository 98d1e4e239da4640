//! PostgreSQL integration for Palaver.
//!
//! This crate provides the Diesel schema, embedded migrations, row models
//! and the [`PostgresChatRepository`] implementation of
//! [`palaver_interface::ChatRepository`].
//!
//! # Example
//!
//! ```rust,no_run
//! use palaver_core::{NewChat, NewMessage, Role};
//! use palaver_database::{PostgresChatRepository, establish_connection, run_migrations};
//! use palaver_interface::ChatRepository;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = establish_connection()?;
//! run_migrations(&mut conn)?;
//!
//! let mut repo = PostgresChatRepository::new(&mut conn);
//! let chat = repo.create_chat(NewChat::new())?;
//! repo.add_message(NewMessage::new(chat.id, Role::User, "Hello"))?;
//! # Ok(())
//! # }
//! ```

mod chat_repository;
mod config;
mod connection;
mod conversions;
mod migrations;
mod models;

// Public modules for external access
pub mod schema;

pub use chat_repository::PostgresChatRepository;
pub use config::DatabaseConfig;
pub use connection::{PgPool, PgPooledConnection, connect, create_pool, establish_connection};
pub use migrations::run_migrations;
pub use models::{
    ChatRow, FileMetadataRow, FilesApiUploadChangeset, MessageFileLinkRow, MessageRow,
    NewChatRow, NewFileMetadataRow, NewMessageRow,
};

pub use palaver_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
