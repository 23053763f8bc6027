mod support;

use sly_core::application::commands::{
    articles::{DeleteArticleCommand, EditArticleCommand, RestoreArticleCommand},
    languages::{AddLanguageCommand, EditLanguageCommand},
};
use sly_core::application::queries::articles::FindArticleQuery;
use sly_core::domain::article::RevisionSelector;
use support::*;

async fn add_german(app: &TestApp) -> i64 {
    app.services
        .language_commands
        .add_language(
            &system(),
            AddLanguageCommand {
                name: "Deutsch".into(),
                locale: "de_DE".into(),
            },
        )
        .await
        .expect("add language")
        .id
        .0
}

#[tokio::test]
async fn the_default_language_is_seeded() {
    let app = test_app().await;
    let languages = app.services.language_queries.list_languages().await.unwrap();
    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0].id.0, 1);
}

#[tokio::test]
async fn new_languages_receive_an_offline_copy_of_the_tree() {
    let app = test_app().await;
    let cat = add_category(&app, None, "News").await;
    let article = add_article(&app, Some(cat), "Post").await;

    let clang = add_german(&app).await;

    let copy = app
        .services
        .article_queries
        .get_article(FindArticleQuery {
            id: article,
            clang: Some(clang),
            revision: RevisionSelector::Latest,
        })
        .await
        .unwrap();
    assert_eq!(copy.name.as_str(), "Post");
    assert_eq!(copy.parent.map(|p| p.0), Some(cat));
    assert!(!copy.online);

    let categories = app
        .services
        .article_queries
        .children_categories(None, Some(clang))
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id.0, cat);
}

#[tokio::test]
async fn content_edits_stay_in_their_language() {
    let app = test_app().await;
    let article = add_article(&app, None, "Home").await;
    let clang = add_german(&app).await;

    app.services
        .article_commands
        .edit_article(
            &system(),
            EditArticleCommand {
                id: article,
                clang,
                name: Some("Startseite".into()),
                article_type: None,
                position: None,
            },
        )
        .await
        .unwrap();

    let name_in = |clang: i64| FindArticleQuery {
        id: article,
        clang: Some(clang),
        revision: RevisionSelector::Latest,
    };
    let english = app.services.article_queries.get_article(name_in(1)).await.unwrap();
    let german = app.services.article_queries.get_article(name_in(clang)).await.unwrap();
    assert_eq!(english.name.as_str(), "Home");
    assert_eq!(german.name.as_str(), "Startseite");
}

#[tokio::test]
async fn structural_changes_apply_to_every_language() {
    let app = test_app().await;
    let clang = add_german(&app).await;
    let a = add_article(&app, None, "A").await;
    let b = add_article(&app, None, "B").await;

    app.services
        .article_commands
        .edit_article(
            &system(),
            EditArticleCommand {
                id: b,
                clang: 1,
                name: None,
                article_type: None,
                position: Some(1),
            },
        )
        .await
        .unwrap();

    let german: Vec<i64> = app
        .services
        .article_queries
        .articles_in_category(None, Some(clang))
        .await
        .unwrap()
        .iter()
        .map(|a| a.id.0)
        .collect();
    assert_eq!(german, vec![b, a]);
}

#[tokio::test]
async fn deleting_a_language_drops_its_content() {
    let app = test_app().await;
    let article = add_article(&app, None, "Home").await;
    let clang = add_german(&app).await;

    app.services
        .language_commands
        .delete_language(&system(), clang)
        .await
        .unwrap();

    let missing = app
        .services
        .article_queries
        .find_article(FindArticleQuery {
            id: article,
            clang: Some(clang),
            revision: RevisionSelector::Latest,
        })
        .await
        .unwrap();
    assert!(missing.is_none());
    assert_eq!(article_ids(&app, None).await, vec![article]);
    assert!(app.event_names().contains(&"SLY_CLANG_DELETED".to_string()));
}

#[tokio::test]
async fn the_default_language_cannot_be_deleted() {
    let app = test_app().await;
    add_german(&app).await;

    assert_code(
        app.services.language_commands.delete_language(&system(), 1).await,
        "clang.is_default",
    );
}

#[tokio::test]
async fn locales_are_validated() {
    let app = test_app().await;
    let clang = add_german(&app).await;

    assert_code(
        app.services
            .language_commands
            .edit_language(
                &system(),
                EditLanguageCommand {
                    id: clang,
                    name: None,
                    locale: Some("german".into()),
                },
            )
            .await,
        "validation",
    );
    assert_code(
        app.services
            .language_commands
            .delete_language(&editor(), clang)
            .await,
        "forbidden",
    );
}

#[tokio::test]
async fn articles_deleted_before_a_language_was_added_restore_into_it() {
    let app = test_app().await;
    let keep = add_article(&app, None, "Keep").await;
    let gone = add_article(&app, None, "Gone").await;
    app.services
        .article_commands
        .delete_article(&system(), DeleteArticleCommand { id: gone })
        .await
        .unwrap();

    let clang = add_german(&app).await;
    let in_german = || FindArticleQuery {
        id: gone,
        clang: Some(clang),
        revision: RevisionSelector::Latest,
    };
    assert!(
        app.services
            .article_queries
            .find_article(in_german())
            .await
            .unwrap()
            .is_none()
    );

    app.services
        .article_commands
        .restore_article(&system(), RestoreArticleCommand { id: gone })
        .await
        .unwrap();

    let restored = app
        .services
        .article_queries
        .get_article(in_german())
        .await
        .unwrap();
    assert_eq!(restored.name.as_str(), "Gone");
    let german_ids: Vec<i64> = app
        .services
        .article_queries
        .articles_in_category(None, Some(clang))
        .await
        .unwrap()
        .iter()
        .map(|a| a.id.0)
        .collect();
    assert_eq!(german_ids, vec![keep, gone]);
    assert_eq!(article_ids(&app, None).await, vec![keep, gone]);
}
