//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::OutputFormat;

/// Palaver - chat, message and upload storage for Gemini-backed chat apps
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(about = "Chat, message and upload storage for Gemini-backed apps", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Output format selected by the global flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Chat session commands
    #[command(subcommand)]
    Chat(ChatCommands),

    /// Message commands
    #[command(subcommand)]
    Message(MessageCommands),

    /// Uploaded file commands
    #[command(subcommand)]
    File(FileCommands),
}

/// Chat subcommands
#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Start a new chat
    New {
        /// Chat title (defaults to "New Chat")
        #[arg(long)]
        title: Option<String>,
    },

    /// List chats, newest first
    List {
        /// Maximum number of chats to display
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(i64).range(0..))]
        limit: i64,
    },

    /// Show a chat with its messages and attachments
    Show {
        /// Chat id
        id: i32,
    },

    /// Change a chat's title
    Rename {
        /// Chat id
        id: i32,
        /// New title
        title: String,
    },

    /// Delete a chat and all of its messages
    Delete {
        /// Chat id
        id: i32,
    },
}

/// Message subcommands
#[derive(Subcommand, Debug)]
pub enum MessageCommands {
    /// Append a message to a chat
    Add {
        /// Chat id
        chat_id: i32,
        /// Author role: user, model or assistant
        role: String,
        /// Message text
        content: String,
        /// Attach a registered file (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
    },

    /// Replace a message's text
    Edit {
        /// Message id
        id: i32,
        /// New text
        content: String,
    },

    /// Delete a message (attached files are kept)
    Delete {
        /// Message id
        id: i32,
    },

    /// Attach a registered file to a message
    Attach {
        /// Message id
        id: i32,
        /// File id
        file_id: String,
    },

    /// Remove a file from a message
    Detach {
        /// Message id
        id: i32,
        /// File id
        file_id: String,
    },
}

/// File subcommands
#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Register metadata for a file stored on local disk
    Register {
        /// Path of the stored file (must be unique)
        local_path: String,
        /// Processing method: inline or files_api
        #[arg(long, default_value = "inline")]
        method: String,
        /// File id (a UUID is generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Original filename
        #[arg(long)]
        filename: Option<String>,
        /// MIME type
        #[arg(long)]
        content_type: Option<String>,
        /// Size in bytes
        #[arg(long)]
        size: Option<i64>,
    },

    /// List registered files, most recent first
    List {
        /// Maximum number of files to display
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(i64).range(0..))]
        limit: i64,
    },

    /// Show a file and the messages it is attached to
    Show {
        /// File id
        id: String,
    },

    /// Record that a file was uploaded to the Gemini Files API
    Uploaded {
        /// File id
        id: String,
        /// Files API resource name, e.g. files/abc123
        gemini_file_id: String,
        /// Upload time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// List files whose Files API copy has expired
    Expired {
        /// Also clear the Files API fields of the listed files
        #[arg(long)]
        clear: bool,
    },

    /// Delete a file's metadata (messages are kept)
    Delete {
        /// File id
        id: String,
    },
}
