//! Core data types for the Palaver chat persistence layer.
//!
//! This crate provides the domain records shared by every storage backend:
//! chats, the messages inside them, and metadata for uploaded files that may
//! be mirrored to the Gemini Files API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod conversation;
mod file;
mod message;
mod processing;
mod role;

pub use chat::{Chat, DEFAULT_CHAT_TITLE, NewChat};
pub use conversation::{Conversation, MessageWithFiles};
pub use file::{FILES_API_EXPIRY_OFFSET_MINUTES, FileMetadata, NewFileMetadata, files_api_expiry};
pub use message::{Message, NewMessage};
pub use processing::ProcessingMethod;
pub use role::Role;
