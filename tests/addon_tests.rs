mod support;

use serde_json::json;
use support::*;

const BASE: &str = "acme/base";
const GALLERY: &str = "acme/gallery";

/// `acme/base` with an install dump and assets, `acme/gallery` requiring it.
fn write_packages(app: &TestApp) {
    let base = write_package(
        &app.addons_dir(),
        BASE,
        "1.0.0",
        &[("sallycms/sallycms", "^0.9"), ("php", ">=5.3")],
        json!({ "install-sql": "install.sql", "uninstall-sql": "uninstall.sql", "assets": "assets" }),
    );
    std::fs::write(
        base.join("install.sql"),
        "-- base tables\nCREATE TABLE acme_base (id INTEGER PRIMARY KEY, label TEXT);\n\
         INSERT INTO acme_base (label) VALUES ('a;b');\n",
    )
    .unwrap();
    std::fs::write(base.join("uninstall.sql"), "DROP TABLE acme_base;").unwrap();
    std::fs::create_dir_all(base.join("assets/css")).unwrap();
    std::fs::write(base.join("assets/css/site.css"), "body {}").unwrap();

    write_package(
        &app.addons_dir(),
        GALLERY,
        "2.1.0",
        &[(BASE, "^1.0")],
        json!({}),
    );
}

async fn install_and_activate(app: &TestApp, name: &str) {
    let manager = &app.services.addon_manager;
    manager.install(&system(), name, true).await.expect("install");
    manager.activate(&system(), name).await.expect("activate");
}

#[tokio::test]
async fn install_applies_the_dump_and_publishes_assets() {
    let app = test_app().await;
    write_packages(&app);

    app.services
        .addon_manager
        .install(&system(), BASE, true)
        .await
        .unwrap();

    let label: String = sqlx::query_scalar("SELECT label FROM acme_base")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(label, "a;b");
    assert!(app.public_dir().join("acme/base/css/site.css").is_file());

    let state = app.services.addons.state(BASE).await.unwrap();
    assert!(state.is_installed());
    assert!(!state.is_activated());
    assert_eq!(state.version.as_deref(), Some("1.0.0"));

    let names = app.event_names();
    let pre = names.iter().position(|n| n == "SLY_ADDON_PRE_INSTALL").unwrap();
    let post = names.iter().position(|n| n == "SLY_ADDON_POST_INSTALL").unwrap();
    assert!(pre < post);
}

#[tokio::test]
async fn requirements_must_be_active_first() {
    let app = test_app().await;
    write_packages(&app);

    assert_code(
        app.services.addon_manager.install(&system(), GALLERY, true).await,
        "addon.missing_requirement",
    );

    install_and_activate(&app, BASE).await;
    install_and_activate(&app, GALLERY).await;
    assert!(app.services.addons.is_activated(GALLERY).await.unwrap());
}

#[tokio::test]
async fn dependents_block_deactivation_and_uninstall() {
    let app = test_app().await;
    write_packages(&app);
    install_and_activate(&app, BASE).await;
    install_and_activate(&app, GALLERY).await;
    let manager = &app.services.addon_manager;

    assert_code(manager.deactivate(&system(), BASE).await, "addon.has_dependents");
    assert_code(manager.uninstall(&system(), BASE).await, "addon.still_active");

    manager.deactivate(&system(), GALLERY).await.unwrap();
    manager.deactivate(&system(), BASE).await.unwrap();
    assert_code(manager.uninstall(&system(), BASE).await, "addon.has_dependents");

    manager.uninstall(&system(), GALLERY).await.unwrap();
    manager.uninstall(&system(), BASE).await.unwrap();

    assert!(!app.services.addons.is_installed(BASE).await.unwrap());
    assert!(!app.public_dir().join("acme/base").exists());
    let table: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'acme_base'",
    )
    .fetch_optional(&app.pool)
    .await
    .unwrap();
    assert!(table.is_none());
}

#[tokio::test]
async fn incompatible_packages_are_refused() {
    let app = test_app().await;
    write_package(
        &app.addons_dir(),
        "acme/future",
        "1.0.0",
        &[("sallycms/sallycms", "^1.0")],
        json!({}),
    );

    assert_code(
        app.services
            .addon_manager
            .install(&system(), "acme/future", false)
            .await,
        "addon.incompatible",
    );
}

#[tokio::test]
async fn load_order_puts_requirements_first() {
    let app = test_app().await;
    write_packages(&app);
    install_and_activate(&app, BASE).await;
    install_and_activate(&app, GALLERY).await;

    let order = app.services.addon_manager.load_order().await.unwrap();
    assert_eq!(order, vec![BASE.to_string(), GALLERY.to_string()]);
}

#[tokio::test]
async fn reactivation_picks_up_a_new_version() {
    let app = test_app().await;
    write_packages(&app);
    install_and_activate(&app, BASE).await;
    let manager = &app.services.addon_manager;
    manager.deactivate(&system(), BASE).await.unwrap();

    write_package(
        &app.addons_dir(),
        BASE,
        "1.1.0",
        &[("sallycms/sallycms", "^0.9")],
        json!({ "assets": "assets" }),
    );
    app.services.packages.refresh().await.unwrap();
    assert!(app.services.addons.needs_update(BASE).await.unwrap());

    manager.activate(&system(), BASE).await.unwrap();

    let state = app.services.addons.state(BASE).await.unwrap();
    assert_eq!(state.version.as_deref(), Some("1.1.0"));
    assert!(state.is_activated());
    assert!(app.event_names().contains(&"SLY_ADDON_POST_UPDATE".to_string()));
}

#[tokio::test]
async fn refresh_forgets_vanished_packages() {
    let app = test_app().await;
    write_packages(&app);
    app.services
        .addon_manager
        .install(&system(), BASE, false)
        .await
        .unwrap();

    std::fs::remove_dir_all(app.addons_dir().join(BASE)).unwrap();
    let dropped = app.services.addon_manager.refresh(&system()).await.unwrap();

    assert_eq!(dropped, vec![BASE.to_string()]);
    assert!(!app.services.addons.is_installed(BASE).await.unwrap());
    assert!(app.services.packages.packages().await.unwrap().contains(&GALLERY.to_string()));
}

#[tokio::test]
async fn editors_cannot_manage_addons() {
    let app = test_app().await;
    write_packages(&app);

    assert_code(
        app.services.addon_manager.install(&editor(), BASE, true).await,
        "forbidden",
    );
}
