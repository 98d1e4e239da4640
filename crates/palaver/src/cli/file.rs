//! Uploaded file command handlers.

use super::commands::FileCommands;
use super::output::{OutputFormat, file_line, message_line, print_json};
use chrono::{DateTime, Utc};
use palaver::{
    ChatRepository, DatabaseError, DatabaseErrorKind, FileMetadata, Message, NewFileMetadata,
    PalaverResult, ProcessingMethod, ValidationError, ValidationErrorKind,
};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a FileMetadata,
    messages: &'a [Message],
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidTimestamp(raw.to_string())))
}

/// Handle file subcommands.
pub fn handle<R: ChatRepository>(
    repo: &mut R,
    cmd: FileCommands,
    format: OutputFormat,
) -> PalaverResult<()> {
    match cmd {
        FileCommands::Register {
            local_path,
            method,
            id,
            filename,
            content_type,
            size,
        } => {
            let method: ProcessingMethod = method.parse()?;
            let mut new_file = match id {
                Some(id) => NewFileMetadata::new(id, local_path, method),
                None => NewFileMetadata::with_generated_id(local_path, method),
            };
            if let Some(filename) = filename {
                new_file = new_file.with_original_filename(filename);
            }
            if let Some(content_type) = content_type {
                new_file = new_file.with_content_type(content_type);
            }
            if let Some(size) = size {
                new_file = new_file.with_size(size);
            }

            let file = repo.create_file(new_file)?;
            match format {
                OutputFormat::Json => print_json(&file),
                OutputFormat::Human => {
                    println!("{}", file_line(&file));
                    Ok(())
                }
            }
        }

        FileCommands::List { limit } => {
            let files = repo.list_files(limit)?;
            match format {
                OutputFormat::Json => print_json(&files),
                OutputFormat::Human => {
                    for file in &files {
                        println!("{}", file_line(file));
                    }
                    println!("Total: {} files", files.len());
                    Ok(())
                }
            }
        }

        FileCommands::Show { id } => {
            let file = repo
                .get_file(&id)?
                .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::NotFound))?;
            let messages = repo.messages_for_file(&id)?;
            match format {
                OutputFormat::Json => print_json(&FileReport {
                    file: &file,
                    messages: &messages,
                }),
                OutputFormat::Human => {
                    println!("{}", file_line(&file));
                    for message in &messages {
                        println!("    chat #{} {}", message.chat_id, message_line(message));
                    }
                    Ok(())
                }
            }
        }

        FileCommands::Uploaded {
            id,
            gemini_file_id,
            at,
        } => {
            let uploaded_at = match at {
                Some(raw) => parse_timestamp(&raw)?,
                None => Utc::now(),
            };
            let file = repo.record_files_api_upload(&id, &gemini_file_id, uploaded_at)?;
            match format {
                OutputFormat::Json => print_json(&file),
                OutputFormat::Human => {
                    println!("{}", file_line(&file));
                    Ok(())
                }
            }
        }

        FileCommands::Expired { clear } => {
            let expired = repo.list_expired_files_api_uploads(Utc::now())?;
            if clear {
                for file in &expired {
                    repo.clear_files_api_upload(&file.id)?;
                }
                info!(count = expired.len(), "Cleared expired Files API uploads");
            }
            match format {
                OutputFormat::Json => print_json(&expired),
                OutputFormat::Human => {
                    for file in &expired {
                        println!("{}", file_line(file));
                    }
                    if clear {
                        println!("Cleared {} expired uploads", expired.len());
                    } else {
                        println!("Total: {} expired uploads", expired.len());
                    }
                    Ok(())
                }
            }
        }

        FileCommands::Delete { id } => {
            if !repo.delete_file(&id)? {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
            }
            println!("Deleted file {}", id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use palaver::{InMemoryChatRepository, PalaverErrorKind};

    fn register(repo: &mut InMemoryChatRepository, id: &str, path: &str) {
        handle(
            repo,
            FileCommands::Register {
                local_path: path.to_string(),
                method: "inline".to_string(),
                id: Some(id.to_string()),
                filename: Some("scan.pdf".to_string()),
                content_type: Some("application/pdf".to_string()),
                size: Some(2048),
            },
            OutputFormat::Human,
        )
        .unwrap();
    }

    #[test]
    fn register_and_record_upload() {
        let mut repo = InMemoryChatRepository::new();
        register(&mut repo, "scan", "/uploads/scan.pdf");

        handle(
            &mut repo,
            FileCommands::Uploaded {
                id: "scan".to_string(),
                gemini_file_id: "files/scan".to_string(),
                at: Some("2025-08-01T06:00:00+02:00".to_string()),
            },
            OutputFormat::Json,
        )
        .unwrap();

        let file = repo.get_file("scan").unwrap().unwrap();
        assert_eq!(file.processing_method, ProcessingMethod::FilesApi);
        assert_eq!(
            file.gemini_api_expiry_timestamp,
            Some(parse_timestamp("2025-08-03T03:55:00Z").unwrap())
        );
    }

    #[test]
    fn register_rejects_unknown_method() {
        let mut repo = InMemoryChatRepository::new();
        let err = handle(
            &mut repo,
            FileCommands::Register {
                local_path: "/uploads/a".to_string(),
                method: "ftp".to_string(),
                id: None,
                filename: None,
                content_type: None,
                size: None,
            },
            OutputFormat::Human,
        )
        .unwrap_err();

        assert!(matches!(err.kind(), PalaverErrorKind::Validation(_)));
        assert!(repo.list_files(10).unwrap().is_empty());
    }

    #[test]
    fn uploaded_rejects_bad_timestamp() {
        let mut repo = InMemoryChatRepository::new();
        register(&mut repo, "scan", "/uploads/scan.pdf");

        let err = handle(
            &mut repo,
            FileCommands::Uploaded {
                id: "scan".to_string(),
                gemini_file_id: "files/scan".to_string(),
                at: Some("yesterday".to_string()),
            },
            OutputFormat::Human,
        )
        .unwrap_err();

        assert!(format!("{}", err).contains("yesterday"));
    }

    #[test]
    fn expired_clear_unsets_remote_fields() {
        let mut repo = InMemoryChatRepository::new();
        register(&mut repo, "old", "/uploads/old.pdf");
        register(&mut repo, "fresh", "/uploads/fresh.pdf");
        repo.record_files_api_upload("old", "files/old", Utc::now() - Duration::days(3))
            .unwrap();
        repo.record_files_api_upload("fresh", "files/fresh", Utc::now())
            .unwrap();

        handle(&mut repo, FileCommands::Expired { clear: true }, OutputFormat::Human).unwrap();

        let old = repo.get_file("old").unwrap().unwrap();
        assert!(old.gemini_api_file_id.is_none());
        assert!(old.gemini_api_expiry_timestamp.is_none());
        let fresh = repo.get_file("fresh").unwrap().unwrap();
        assert_eq!(fresh.gemini_api_file_id.as_deref(), Some("files/fresh"));
    }
}
