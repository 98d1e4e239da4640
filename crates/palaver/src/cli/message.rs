//! Message command handlers.

use super::commands::MessageCommands;
use super::output::{OutputFormat, message_line, print_json};
use palaver::{ChatRepository, DatabaseError, DatabaseErrorKind, NewMessage, PalaverResult};
use tracing::debug;

/// Handle message subcommands.
pub fn handle<R: ChatRepository>(
    repo: &mut R,
    cmd: MessageCommands,
    format: OutputFormat,
) -> PalaverResult<()> {
    match cmd {
        MessageCommands::Add {
            chat_id,
            role,
            content,
            files,
        } => {
            let message = repo.add_message(NewMessage::parse(chat_id, &role, content)?)?;
            for file_id in &files {
                repo.attach_file(message.id, file_id)?;
                debug!(message_id = message.id, file_id = %file_id, "Attached file");
            }
            match format {
                OutputFormat::Json => print_json(&message),
                OutputFormat::Human => {
                    println!("#{} {}", message.id, message_line(&message));
                    Ok(())
                }
            }
        }

        MessageCommands::Edit { id, content } => {
            let message = repo.update_message_content(id, &content)?;
            match format {
                OutputFormat::Json => print_json(&message),
                OutputFormat::Human => {
                    println!("#{} {}", message.id, message_line(&message));
                    Ok(())
                }
            }
        }

        MessageCommands::Delete { id } => {
            if !repo.delete_message(id)? {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
            }
            println!("Deleted message {}", id);
            Ok(())
        }

        MessageCommands::Attach { id, file_id } => {
            repo.attach_file(id, &file_id)?;
            println!("Attached {} to message {}", file_id, id);
            Ok(())
        }

        MessageCommands::Detach { id, file_id } => {
            if repo.detach_file(id, &file_id)? {
                println!("Detached {} from message {}", file_id, id);
            } else {
                println!("{} was not attached to message {}", file_id, id);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver::{
        InMemoryChatRepository, NewChat, NewFileMetadata, PalaverErrorKind, ProcessingMethod,
    };

    #[test]
    fn add_with_attachments() {
        let mut repo = InMemoryChatRepository::new();
        let chat = repo.create_chat(NewChat::new()).unwrap();
        repo.create_file(NewFileMetadata::new("img", "/uploads/img.png", ProcessingMethod::Inline))
            .unwrap();

        handle(
            &mut repo,
            MessageCommands::Add {
                chat_id: chat.id,
                role: "user".to_string(),
                content: "what's in this picture?".to_string(),
                files: vec!["img".to_string()],
            },
            OutputFormat::Human,
        )
        .unwrap();

        let messages = repo.list_messages(chat.id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(repo.files_for_message(messages[0].id).unwrap().len(), 1);
    }

    #[test]
    fn add_rejects_unknown_role() {
        let mut repo = InMemoryChatRepository::new();
        let chat = repo.create_chat(NewChat::new()).unwrap();

        let err = handle(
            &mut repo,
            MessageCommands::Add {
                chat_id: chat.id,
                role: "admin".to_string(),
                content: "sudo".to_string(),
                files: Vec::new(),
            },
            OutputFormat::Human,
        )
        .unwrap_err();

        assert!(matches!(err.kind(), PalaverErrorKind::Validation(_)));
        assert!(repo.list_messages(chat.id).unwrap().is_empty());
    }
}
