//! Rendering of command results.

use chrono::{DateTime, SecondsFormat, Utc};
use palaver::{Chat, FileMetadata, Message, PalaverError, PalaverErrorKind, PalaverResult};
use serde::Serialize;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> PalaverResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PalaverError::new(PalaverErrorKind::Output(e.to_string())))?;
    println!("{}", json);
    Ok(())
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One-line summary of a chat.
pub fn chat_line(chat: &Chat) -> String {
    format!("#{:<6} {}  {}", chat.id, timestamp(&chat.create_time), chat.title)
}

/// One-line summary of a message.
pub fn message_line(message: &Message) -> String {
    format!(
        "[{}] {:>9}: {}",
        timestamp(&message.timestamp),
        message.role,
        message.content
    )
}

/// One-line summary of a file.
pub fn file_line(file: &FileMetadata) -> String {
    let name = file.original_filename.as_deref().unwrap_or("-");
    let remote = match (&file.gemini_api_file_id, &file.gemini_api_expiry_timestamp) {
        (Some(remote_id), Some(expiry)) => {
            format!("  {} (expires {})", remote_id, timestamp(expiry))
        }
        (Some(remote_id), None) => format!("  {}", remote_id),
        _ => String::new(),
    };
    format!(
        "{}  {}  {}  {}{}",
        file.id, file.processing_method, name, file.local_disk_path, remote
    )
}
