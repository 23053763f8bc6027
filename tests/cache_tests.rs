mod support;

use sly_core::application::commands::articles::EditArticleCommand;
use sly_core::application::ports::cache::Cache;
use sly_core::application::queries::articles::FindArticleQuery;
use support::*;

async fn cached_name(app: &TestApp, id: i64) -> String {
    app.services
        .article_queries
        .get_article(FindArticleQuery::latest(id))
        .await
        .unwrap()
        .name
        .as_str()
        .to_string()
}

async fn rename_behind_the_cache(app: &TestApp, id: i64, name: &str) {
    sqlx::query("UPDATE sly_article SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn queries_are_served_from_the_cache() {
    let app = test_app().await;
    let id = add_article(&app, None, "Original").await;

    assert_eq!(cached_name(&app, id).await, "Original");
    assert!(!app.cache.is_empty());

    rename_behind_the_cache(&app, id, "Changed").await;
    assert_eq!(cached_name(&app, id).await, "Original");

    app.services.flush_cache(&system(), "sly").await.unwrap();
    assert_eq!(cached_name(&app, id).await, "Changed");
}

#[tokio::test]
async fn commands_invalidate_what_they_change() {
    let app = test_app().await;
    let id = add_article(&app, None, "Original").await;
    assert_eq!(article_ids(&app, None).await, vec![id]);
    assert_eq!(cached_name(&app, id).await, "Original");

    app.services
        .article_commands
        .edit_article(
            &system(),
            EditArticleCommand {
                id,
                clang: 1,
                name: Some("Edited".into()),
                article_type: None,
                position: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cached_name(&app, id).await, "Edited");

    let second = add_article(&app, None, "Second").await;
    assert_eq!(article_ids(&app, None).await, vec![id, second]);
}

#[tokio::test]
async fn flushing_a_namespace_keeps_its_siblings() {
    let app = test_app().await;
    let cache: &dyn Cache = &*app.cache;
    cache.set("sly.article.row", "k", "1").await.unwrap();
    cache.set("sly.medium", "k", "2").await.unwrap();

    app.services.flush_cache(&system(), "sly.article").await.unwrap();

    assert!(!cache.exists("sly.article.row", "k").await.unwrap());
    assert_eq!(cache.get("sly.medium", "k").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn flushing_requires_the_cache_capability() {
    let app = test_app().await;

    assert_code(app.services.flush_cache(&editor(), "sly").await, "forbidden");
    assert_code(app.services.flush_cache(&system(), "sly..x").await, "validation");
}
