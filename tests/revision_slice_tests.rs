mod support;

use serde_json::json;
use sly_core::application::commands::{
    articles::{ChangeArticleStatusCommand, TouchArticleCommand},
    slices::{AddSliceCommand, EditSliceCommand, MoveSliceCommand, SliceDirection},
};
use sly_core::application::queries::{articles::FindArticleQuery, slices::ListSlicesQuery};
use sly_core::domain::article::RevisionSelector;
use sly_core::domain::slice::{ArticleSlice, SliceValues};
use support::*;

fn text(value: &str) -> SliceValues {
    SliceValues::from([("text".to_string(), json!(value))])
}

async fn add_slice(app: &TestApp, article: i64, slot: &str, value: &str) -> ArticleSlice {
    app.services
        .slice_commands
        .add_slice(
            &system(),
            AddSliceCommand {
                article_id: article,
                clang: 1,
                revision: None,
                slot: slot.into(),
                module: "text".into(),
                values: text(value),
                position: None,
            },
        )
        .await
        .expect("add slice")
}

async fn slice_texts(app: &TestApp, article: i64, revision: RevisionSelector) -> Vec<String> {
    app.services
        .slice_queries
        .list_slices(ListSlicesQuery {
            article_id: article,
            clang: 1,
            revision,
            slot: Some("main".into()),
        })
        .await
        .expect("slices")
        .iter()
        .map(|s| s.slice.value("text").and_then(|v| v.as_str()).unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn slices_are_appended_with_zero_based_positions() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;

    let first = add_slice(&app, article, "main", "one").await;
    let second = add_slice(&app, article, "main", "two").await;
    let aside = add_slice(&app, article, "aside", "side").await;

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
    assert_eq!(aside.position, 0);
    assert_eq!(slice_texts(&app, article, RevisionSelector::Latest).await, vec!["one", "two"]);
}

#[tokio::test]
async fn moving_a_slice_swaps_it_with_its_neighbour() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    let first = add_slice(&app, article, "main", "one").await;
    add_slice(&app, article, "main", "two").await;

    let moved = app
        .services
        .slice_commands
        .move_slice(
            &system(),
            MoveSliceCommand {
                id: first.id.0,
                direction: SliceDirection::Down,
            },
        )
        .await
        .unwrap();
    assert!(moved);
    assert_eq!(slice_texts(&app, article, RevisionSelector::Latest).await, vec!["two", "one"]);

    let at_edge = app
        .services
        .slice_commands
        .move_slice(
            &system(),
            MoveSliceCommand {
                id: first.id.0,
                direction: SliceDirection::Down,
            },
        )
        .await
        .unwrap();
    assert!(!at_edge);
}

#[tokio::test]
async fn touching_an_article_copies_slices_into_the_new_revision() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    add_slice(&app, article, "main", "draft").await;

    let revision = app
        .services
        .article_commands
        .touch_article(&system(), TouchArticleCommand { id: article, clang: 1 })
        .await
        .unwrap();
    assert_eq!(revision, 1);

    let latest = app
        .services
        .article_queries
        .get_article(FindArticleQuery::latest(article))
        .await
        .unwrap();
    assert_eq!(latest.revision, 1);
    assert!(latest.latest);

    assert_eq!(slice_texts(&app, article, RevisionSelector::Exact(0)).await, vec!["draft"]);
    assert_eq!(slice_texts(&app, article, RevisionSelector::Latest).await, vec!["draft"]);

    let revisions: Vec<i64> = app
        .services
        .article_queries
        .revisions(article, None)
        .await
        .unwrap()
        .iter()
        .map(|r| r.revision)
        .collect();
    assert_eq!(revisions, vec![1, 0]);
}

#[tokio::test]
async fn history_revisions_are_read_only() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    let old = add_slice(&app, article, "main", "old").await;
    app.services
        .article_commands
        .touch_article(&system(), TouchArticleCommand { id: article, clang: 1 })
        .await
        .unwrap();

    assert_code(
        app.services
            .slice_commands
            .edit_slice(
                &system(),
                EditSliceCommand {
                    id: old.id.0,
                    values: text("changed"),
                },
            )
            .await,
        "slice.revision_not_latest",
    );
    assert_code(
        app.services
            .slice_commands
            .add_slice(
                &system(),
                AddSliceCommand {
                    article_id: article,
                    clang: 1,
                    revision: Some(0),
                    slot: "main".into(),
                    module: "text".into(),
                    values: text("late"),
                    position: None,
                },
            )
            .await,
        "slice.revision_not_latest",
    );
}

#[tokio::test]
async fn publishing_makes_the_latest_revision_the_online_one() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    add_slice(&app, article, "main", "first").await;

    let publish = |online| ChangeArticleStatusCommand {
        id: article,
        clang: 1,
        online,
    };
    app.services
        .article_commands
        .change_article_status(&system(), publish(true))
        .await
        .unwrap();
    assert_eq!(slice_texts(&app, article, RevisionSelector::Online).await, vec!["first"]);

    app.services
        .article_commands
        .touch_article(&system(), TouchArticleCommand { id: article, clang: 1 })
        .await
        .unwrap();
    let second = add_slice(&app, article, "main", "second").await;
    assert_eq!(second.key.revision, 1);

    // the draft stays invisible until it is published
    assert_eq!(slice_texts(&app, article, RevisionSelector::Online).await, vec!["first"]);

    app.services
        .article_commands
        .change_article_status(&system(), publish(true))
        .await
        .unwrap();
    assert_eq!(
        slice_texts(&app, article, RevisionSelector::Online).await,
        vec!["first", "second"]
    );

    app.services
        .article_commands
        .change_article_status(&system(), publish(false))
        .await
        .unwrap();
    let err = app
        .services
        .slice_queries
        .list_slices(ListSlicesQuery {
            article_id: article,
            clang: 1,
            revision: RevisionSelector::Online,
            slot: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "not_found");
}

#[tokio::test]
async fn slice_changes_are_announced() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    let slice = add_slice(&app, article, "main", "one").await;
    app.services
        .slice_commands
        .delete_slice(&system(), slice.id.0)
        .await
        .unwrap();

    let names = app.event_names();
    assert!(names.contains(&"SLY_SLICE_ADDED".to_string()));
    assert!(names.contains(&"SLY_SLICE_DELETED".to_string()));
    assert!(slice_texts(&app, article, RevisionSelector::Latest).await.is_empty());
}

#[tokio::test]
async fn deleting_a_middle_slice_closes_the_gap() {
    let app = test_app().await;
    let article = add_article(&app, None, "Page").await;
    add_slice(&app, article, "main", "one").await;
    let middle = add_slice(&app, article, "main", "two").await;
    add_slice(&app, article, "main", "three").await;

    app.services
        .slice_commands
        .delete_slice(&system(), middle.id.0)
        .await
        .unwrap();

    let remaining = app
        .services
        .slice_queries
        .list_slices(ListSlicesQuery {
            article_id: article,
            clang: 1,
            revision: RevisionSelector::Latest,
            slot: Some("main".into()),
        })
        .await
        .unwrap();
    let positions: Vec<i64> = remaining.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(slice_texts(&app, article, RevisionSelector::Latest).await, vec!["one", "three"]);
}
