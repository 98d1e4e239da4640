//! Chat command handlers.

use super::commands::ChatCommands;
use super::output::{OutputFormat, chat_line, file_line, message_line, print_json};
use palaver::{ChatRepository, DatabaseError, DatabaseErrorKind, NewChat, PalaverResult};

/// Handle chat subcommands.
pub fn handle<R: ChatRepository>(
    repo: &mut R,
    cmd: ChatCommands,
    format: OutputFormat,
) -> PalaverResult<()> {
    match cmd {
        ChatCommands::New { title } => {
            let mut new_chat = NewChat::new();
            if let Some(title) = title {
                new_chat = new_chat.with_title(title);
            }
            let chat = repo.create_chat(new_chat)?;
            match format {
                OutputFormat::Json => print_json(&chat),
                OutputFormat::Human => {
                    println!("{}", chat_line(&chat));
                    Ok(())
                }
            }
        }

        ChatCommands::List { limit } => {
            let chats = repo.list_chats(limit)?;
            match format {
                OutputFormat::Json => print_json(&chats),
                OutputFormat::Human => {
                    for chat in &chats {
                        println!("{}", chat_line(chat));
                    }
                    println!("Total: {} chats", chats.len());
                    Ok(())
                }
            }
        }

        ChatCommands::Show { id } => {
            let conversation = repo
                .load_conversation(id)?
                .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
            match format {
                OutputFormat::Json => print_json(&conversation),
                OutputFormat::Human => {
                    println!("{}", chat_line(&conversation.chat));
                    println!("{:-<80}", "");
                    for entry in &conversation.messages {
                        println!("{}", message_line(&entry.message));
                        for file in &entry.files {
                            println!("    + {}", file_line(file));
                        }
                    }
                    println!("{:-<80}", "");
                    println!("Total: {} messages", conversation.message_count());
                    Ok(())
                }
            }
        }

        ChatCommands::Rename { id, title } => {
            let chat = repo.rename_chat(id, &title)?;
            match format {
                OutputFormat::Json => print_json(&chat),
                OutputFormat::Human => {
                    println!("{}", chat_line(&chat));
                    Ok(())
                }
            }
        }

        ChatCommands::Delete { id } => {
            if !repo.delete_chat(id)? {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
            }
            println!("Deleted chat {}", id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver::{InMemoryChatRepository, NewMessage, Role};

    #[test]
    fn new_then_delete_chat() {
        let mut repo = InMemoryChatRepository::new();
        handle(
            &mut repo,
            ChatCommands::New {
                title: Some("Planning".to_string()),
            },
            OutputFormat::Human,
        )
        .unwrap();

        let chat = repo.list_chats(1).unwrap().remove(0);
        assert_eq!(chat.title, "Planning");
        repo.add_message(NewMessage::new(chat.id, Role::User, "hi")).unwrap();

        handle(&mut repo, ChatCommands::Delete { id: chat.id }, OutputFormat::Json).unwrap();
        assert_eq!(repo.message_count(), 0);
    }

    #[test]
    fn show_missing_chat_is_not_found() {
        let mut repo = InMemoryChatRepository::new();
        let err =
            handle(&mut repo, ChatCommands::Show { id: 9 }, OutputFormat::Human).unwrap_err();
        assert!(format!("{}", err).contains("Record not found"));
    }
}
