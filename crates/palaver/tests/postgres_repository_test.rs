//! Integration tests for the PostgreSQL repository.
//!
//! These need a reachable database configured through `DATABASE_URL` (or the
//! `DATABASE_*` variables). Every test runs inside a transaction that is
//! rolled back, so the database is left untouched.

#![cfg(feature = "postgres-tests")]

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::prelude::*;
use palaver::{
    ChatRepository, DatabaseConfig, DatabaseError, DatabaseErrorKind, NewChat, NewFileMetadata,
    NewMessage, PgConnection, PostgresChatRepository, ProcessingMethod, Role, create_pool,
    establish_connection, files_api_expiry, run_migrations,
};
use palaver_database::NewMessageRow;
use palaver_database::schema::{file_metadata, messages};

fn inline_file(id: &str) -> NewFileMetadata {
    NewFileMetadata::new(id, format!("/uploads/{}", id), ProcessingMethod::Inline)
}

// Later than anything a shared test database already holds
fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap()
}

fn connection() -> PgConnection {
    let mut conn = establish_connection().expect("DATABASE_URL must point at a test database");
    run_migrations(&mut conn).expect("Failed to run migrations");
    conn
}

#[test]
fn chat_lifecycle_cascades_to_messages_and_links() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);

        let chat = repo.create_chat(NewChat::new())?;
        assert_eq!(chat.title, "New Chat");

        let renamed = repo.rename_chat(chat.id, "Trip planning")?;
        assert_eq!(renamed.title, "Trip planning");

        let message = repo.add_message(NewMessage::new(chat.id, Role::User, "Where to?"))?;
        let file = repo.create_file(NewFileMetadata::with_generated_id(
            "/uploads/map.png",
            ProcessingMethod::Inline,
        ))?;
        repo.attach_file(message.id, &file.id)?;

        assert!(repo.delete_chat(chat.id)?);
        assert!(repo.get_message(message.id)?.is_none());
        assert!(repo.messages_for_file(&file.id)?.is_empty());
        assert!(repo.get_file(&file.id)?.is_some());
        assert!(!repo.delete_chat(chat.id)?);
        Ok(())
    });
}

#[test]
fn messages_are_listed_in_timestamp_order() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let chat = repo.create_chat(NewChat::new().with_title("Order"))?;
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        repo.add_message(
            NewMessage::new(chat.id, Role::Model, "second")
                .with_timestamp(base + Duration::seconds(5)),
        )?;
        repo.add_message(NewMessage::new(chat.id, Role::User, "first").with_timestamp(base))?;
        repo.add_message(
            NewMessage::new(chat.id, Role::Assistant, "third")
                .with_timestamp(base + Duration::seconds(9)),
        )?;

        let contents: Vec<String> = repo
            .list_messages(chat.id)?
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        Ok(())
    });
}

#[test]
fn chats_with_equal_create_time_list_newest_id_first() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let first = repo.create_chat(NewChat::new().with_create_time(far_future()))?;
        let second = repo.create_chat(NewChat::new().with_create_time(far_future()))?;

        let ids: Vec<i32> = repo.list_chats(2)?.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(repo.list_chats(-1)?.is_empty());
        Ok(())
    });
}

#[test]
fn message_for_missing_chat_is_rejected() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let err = repo
            .add_message(NewMessage::new(i32::MAX, Role::User, "orphan"))
            .unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::ForeignKeyViolation(_)));
        Ok(())
    });
}

#[test]
fn unknown_role_is_rejected_by_the_schema() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let chat = PostgresChatRepository::new(conn).create_chat(NewChat::new())?;

        let err: DatabaseError = diesel::insert_into(messages::table)
            .values(&NewMessageRow {
                chat_id: chat.id,
                role: "admin".to_string(),
                content: "sudo".to_string(),
                timestamp: Utc::now(),
            })
            .execute(conn)
            .unwrap_err()
            .into();
        assert!(matches!(err.kind, DatabaseErrorKind::CheckViolation(_)));
        Ok(())
    });
}

#[test]
fn inconsistent_expiry_is_rejected_by_the_schema() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let uploaded = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let file = PostgresChatRepository::new(conn).create_file(
            NewFileMetadata::new("exp", "/uploads/exp.pdf", ProcessingMethod::Inline)
                .with_files_api_upload("files/exp", uploaded),
        )?;
        assert_eq!(file.gemini_api_expiry_timestamp, Some(files_api_expiry(uploaded)));

        let err: DatabaseError = diesel::update(file_metadata::table.find("exp"))
            .set(
                file_metadata::gemini_api_expiry_timestamp.eq(Some(uploaded + Duration::hours(48))),
            )
            .execute(conn)
            .unwrap_err()
            .into();
        assert!(matches!(err.kind, DatabaseErrorKind::CheckViolation(_)));
        Ok(())
    });
}

#[test]
fn expiry_without_upload_is_not_stored() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let stray = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut new_file = inline_file("stray");
        new_file.gemini_api_expiry_timestamp = Some(stray);

        let file = PostgresChatRepository::new(conn).create_file(new_file)?;
        assert!(file.gemini_api_upload_timestamp.is_none());
        assert!(file.gemini_api_expiry_timestamp.is_none());

        let err: DatabaseError = diesel::update(file_metadata::table.find("stray"))
            .set(file_metadata::gemini_api_expiry_timestamp.eq(Some(stray)))
            .execute(conn)
            .unwrap_err()
            .into();
        assert!(matches!(err.kind, DatabaseErrorKind::CheckViolation(_)));
        Ok(())
    });
}

#[test]
fn files_list_newest_upload_first() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let base = far_future();
        repo.create_file(inline_file("old").with_upload_timestamp(base))?;
        repo.create_file(inline_file("new").with_upload_timestamp(base + Duration::hours(2)))?;
        repo.create_file(inline_file("mid-b").with_upload_timestamp(base + Duration::hours(1)))?;
        repo.create_file(inline_file("mid-a").with_upload_timestamp(base + Duration::hours(1)))?;

        let ids: Vec<String> = repo.list_files(4)?.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["new", "mid-a", "mid-b", "old"]);
        assert_eq!(repo.list_files(1)?[0].id, "new");
        assert!(repo.list_files(-3)?.is_empty());
        Ok(())
    });
}

#[test]
fn message_files_ordered_by_upload_then_id() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let chat = repo.create_chat(NewChat::new())?;
        let message = repo.add_message(NewMessage::new(chat.id, Role::User, "three files"))?;
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        repo.create_file(inline_file("late").with_upload_timestamp(base + Duration::minutes(10)))?;
        repo.create_file(inline_file("b").with_upload_timestamp(base))?;
        repo.create_file(inline_file("a").with_upload_timestamp(base))?;
        for id in ["late", "b", "a"] {
            repo.attach_file(message.id, id)?;
        }

        let ids: Vec<String> = repo
            .files_for_message(message.id)?
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "late"]);
        Ok(())
    });
}

#[test]
fn duplicate_local_path_is_rejected() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        repo.create_file(NewFileMetadata::new("a", "/uploads/same.txt", ProcessingMethod::Inline))?;

        let found = repo.find_file_by_path("/uploads/same.txt")?;
        assert_eq!(found.map(|f| f.id), Some("a".to_string()));

        let err = repo
            .create_file(NewFileMetadata::new("b", "/uploads/same.txt", ProcessingMethod::Inline))
            .unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::UniqueViolation(_)));
        Ok(())
    });
}

#[test]
fn files_are_shared_between_messages() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let chat = repo.create_chat(NewChat::new())?;
        let first = repo.add_message(NewMessage::new(chat.id, Role::User, "look"))?;
        let second = repo.add_message(NewMessage::new(chat.id, Role::User, "again"))?;
        let image = repo.create_file(inline_file("img"))?;
        let doc = repo.create_file(inline_file("doc"))?;

        repo.attach_file(first.id, &image.id)?;
        repo.attach_file(first.id, &image.id)?;
        repo.attach_file(first.id, &doc.id)?;
        repo.attach_file(second.id, &image.id)?;

        assert_eq!(repo.files_for_message(first.id)?.len(), 2);
        assert_eq!(repo.messages_for_file(&image.id)?.len(), 2);

        let conversation = repo.load_conversation(chat.id)?.expect("chat exists");
        assert_eq!(conversation.message_count(), 2);
        assert_eq!(conversation.messages[0].files.len(), 2);
        assert_eq!(conversation.messages[1].files.len(), 1);

        assert!(repo.delete_file(&image.id)?);
        assert_eq!(repo.files_for_message(first.id)?.len(), 1);
        assert!(repo.get_message(second.id)?.is_some());

        assert!(repo.delete_message(first.id)?);
        assert!(repo.get_file(&doc.id)?.is_some());
        assert!(!repo.detach_file(first.id, &doc.id)?);
        Ok(())
    });
}

#[test]
fn attaching_missing_file_is_rejected() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let chat = repo.create_chat(NewChat::new())?;
        let message = repo.add_message(NewMessage::new(chat.id, Role::User, "hi"))?;

        let err = repo.attach_file(message.id, "missing").unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::ForeignKeyViolation(_)));
        Ok(())
    });
}

#[test]
fn expired_uploads_are_listed_and_cleared() {
    let mut conn = connection();
    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let uploaded = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
        repo.create_file(inline_file("old"))?;
        repo.create_file(inline_file("new"))?;

        let old = repo.record_files_api_upload("old", "files/old", uploaded)?;
        assert_eq!(old.processing_method, ProcessingMethod::FilesApi);
        assert_eq!(old.gemini_api_expiry_timestamp, Some(files_api_expiry(uploaded)));
        repo.record_files_api_upload("new", "files/new", uploaded + Duration::days(1))?;

        let now = files_api_expiry(uploaded);
        let expired: Vec<String> = repo
            .list_expired_files_api_uploads(now)?
            .into_iter()
            .map(|f| f.id)
            .filter(|id| id == "old" || id == "new")
            .collect();
        assert_eq!(expired, vec!["old".to_string()]);

        let cleared = repo.clear_files_api_upload("old")?;
        assert!(cleared.gemini_api_file_id.is_none());
        assert!(cleared.gemini_api_upload_timestamp.is_none());
        assert!(cleared.gemini_api_expiry_timestamp.is_none());

        let err = repo.clear_files_api_upload("nope").unwrap_err();
        assert_eq!(err.kind, DatabaseErrorKind::NotFound);
        Ok(())
    });
}

#[test]
fn pool_hands_out_connections() {
    let config = DatabaseConfig::default().with_env_overrides();
    let pool = create_pool(&config).expect("Failed to create pool");
    let mut conn = pool.get().expect("Failed to check out connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    conn.test_transaction::<_, DatabaseError, _>(|conn| {
        let mut repo = PostgresChatRepository::new(conn);
        let chat = repo.create_chat(NewChat::new().with_title("Pooled"))?;
        assert_eq!(repo.get_chat(chat.id)?.map(|c| c.title), Some("Pooled".to_string()));
        Ok(())
    });
}
