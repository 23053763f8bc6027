// tests/support/builders.rs
use std::path::Path;

use serde_json::{Value, json};
use sly_core::application::commands::{
    articles::AddArticleCommand, categories::AddCategoryCommand,
};
use sly_core::domain::article::{Article, ArticleId};

use super::helpers::{TestApp, system};

pub async fn add_category(app: &TestApp, parent: Option<i64>, name: &str) -> i64 {
    app.services
        .category_commands
        .add_category(
            &system(),
            AddCategoryCommand {
                parent,
                name: name.into(),
                position: None,
            },
        )
        .await
        .expect("add category")
        .0
}

pub async fn add_article(app: &TestApp, category: Option<i64>, name: &str) -> i64 {
    let mut builder = AddArticleCommand::builder().name(name);
    if let Some(category) = category {
        builder = builder.category(category);
    }
    app.services
        .article_commands
        .add_article(&system(), builder.build().expect("command"))
        .await
        .expect("add article")
        .0
}

/// Ids of the plain articles in `category`, in position order.
pub async fn article_ids(app: &TestApp, category: Option<i64>) -> Vec<i64> {
    app.services
        .article_queries
        .articles_in_category(category, None)
        .await
        .expect("articles")
        .iter()
        .map(|a| a.id.0)
        .collect()
}

/// Ids of the child categories of `parent`, in position order.
pub async fn category_ids(app: &TestApp, parent: Option<i64>) -> Vec<i64> {
    app.services
        .article_queries
        .children_categories(parent, None)
        .await
        .expect("categories")
        .iter()
        .map(|a| a.id.0)
        .collect()
}

pub fn positions(articles: &[Article]) -> Vec<i64> {
    articles
        .iter()
        .map(|a| if a.startpage { a.cat_position } else { a.position })
        .collect()
}

pub fn id(raw: i64) -> ArticleId {
    ArticleId(raw)
}

/// Writes `<root>/<vendor>/<name>/composer.json` and returns the package
/// directory.
pub fn write_package(
    root: &Path,
    name: &str,
    version: &str,
    require: &[(&str, &str)],
    sallycms: Value,
) -> std::path::PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("package dir");
    let require: serde_json::Map<String, Value> = require
        .iter()
        .map(|(name, constraint)| (name.to_string(), json!(constraint)))
        .collect();
    let manifest = json!({
        "name": name,
        "version": version,
        "require": require,
        "extra": { "sallycms": sallycms },
    });
    std::fs::write(
        dir.join("composer.json"),
        serde_json::to_string_pretty(&manifest).expect("manifest"),
    )
    .expect("write manifest");
    dir
}
