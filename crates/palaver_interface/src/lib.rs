//! Persistence interface for Palaver.
//!
//! [`ChatRepository`] is the contract every storage backend implements.
//! [`InMemoryChatRepository`] is a backend that keeps everything in memory
//! while enforcing the same constraints as the SQL schema.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod in_memory;
mod repository;

pub use in_memory::InMemoryChatRepository;
pub use repository::ChatRepository;
