mod support;

use std::path::PathBuf;

use sly_core::application::commands::media::{
    AddMediaCategoryCommand, AddMediumCommand, EditMediumCommand,
};
use sly_core::domain::media::Medium;
use support::*;

fn upload(app: &TestApp, name: &str, body: &[u8]) -> PathBuf {
    let dir = app.root.path().join("uploads");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

async fn add_medium(app: &TestApp, source: PathBuf, category: Option<i64>) -> Medium {
    app.services
        .media_commands
        .add_medium(
            &system(),
            AddMediumCommand {
                source,
                original_name: None,
                title: "  Team  ".into(),
                category,
            },
        )
        .await
        .expect("add medium")
}

async fn add_media_category(app: &TestApp, name: &str, parent: Option<i64>) -> i64 {
    app.services
        .media_commands
        .add_media_category(
            &system(),
            AddMediaCategoryCommand {
                name: name.into(),
                parent,
            },
        )
        .await
        .expect("add media category")
        .id
        .0
}

#[tokio::test]
async fn uploads_get_normalized_unique_filenames() {
    let app = test_app().await;
    let source = upload(&app, "Team Photo.JPG", b"jpeg bytes");

    let first = add_medium(&app, source.clone(), None).await;
    let second = add_medium(&app, source, None).await;

    assert_eq!(first.filename, "team_photo.jpg");
    assert_eq!(second.filename, "team_photo_1.jpg");
    assert_eq!(first.original_name, "Team Photo.JPG");
    assert_eq!(first.title, "Team");
    assert_eq!(first.filesize, 10);
    assert!(first.is_image());
    assert!(app.media_dir().join("team_photo_1.jpg").is_file());

    let found = app
        .services
        .media_queries
        .find_medium_by_filename("team_photo.jpg")
        .await
        .unwrap()
        .expect("medium");
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn executable_uploads_are_refused() {
    let app = test_app().await;
    let source = upload(&app, "shell.php", b"<?php");

    assert_code(
        app.services
            .media_commands
            .add_medium(
                &system(),
                AddMediumCommand {
                    source,
                    original_name: None,
                    title: String::new(),
                    category: None,
                },
            )
            .await,
        "medium.blocked_extension",
    );
    assert!(!app.media_dir().join("shell.php").exists());
}

#[tokio::test]
async fn categories_holding_media_or_children_cannot_be_deleted() {
    let app = test_app().await;
    let parent = add_media_category(&app, "Images", None).await;
    let child = add_media_category(&app, "Team", Some(parent)).await;
    let medium = add_medium(&app, upload(&app, "a.png", b"png"), Some(child)).await;

    assert_code(
        app.services
            .media_commands
            .delete_media_category(&system(), parent)
            .await,
        "media_category.has_children",
    );
    assert_code(
        app.services
            .media_commands
            .delete_media_category(&system(), child)
            .await,
        "media_category.has_media",
    );

    app.services
        .media_commands
        .edit_medium(
            &system(),
            EditMediumCommand {
                id: medium.id.0,
                title: None,
                category: Some(None),
            },
        )
        .await
        .unwrap();
    app.services
        .media_commands
        .delete_media_category(&system(), child)
        .await
        .unwrap();
    app.services
        .media_commands
        .delete_media_category(&system(), parent)
        .await
        .unwrap();
    assert!(
        app.services
            .media_queries
            .media_categories(None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn child_categories_extend_the_parent_path() {
    let app = test_app().await;
    let parent = add_media_category(&app, "Images", None).await;
    let child = add_media_category(&app, "Team", Some(parent)).await;

    let category = app
        .services
        .media_queries
        .find_media_category(child)
        .await
        .unwrap();
    assert_eq!(category.path.as_str(), format!("|{parent}|"));
}

#[tokio::test]
async fn deleting_a_medium_removes_its_file() {
    let app = test_app().await;
    let medium = add_medium(&app, upload(&app, "doc.pdf", b"%PDF"), None).await;
    let file = app.services.media_queries.file_path(&medium);
    assert!(file.is_file());

    // warm the cache so the delete has something to invalidate
    app.services
        .media_queries
        .find_medium(medium.id.0)
        .await
        .unwrap();
    app.services
        .media_commands
        .delete_medium(&system(), medium.id.0)
        .await
        .unwrap();

    assert!(!file.exists());
    assert_code(
        app.services.media_queries.find_medium(medium.id.0).await,
        "not_found",
    );
    assert!(app.event_names().contains(&"SLY_MEDIA_DELETED".to_string()));
}
