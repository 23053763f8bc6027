mod support;

use sly_core::application::commands::users::{
    ChangePasswordCommand, CreateUserCommand, EditUserCommand,
};
use sly_core::domain::user::{Role, User, UserAttributes};
use support::*;

fn create(login: &str, role: Role) -> CreateUserCommand {
    CreateUserCommand {
        login: login.into(),
        password: "correct horse".into(),
        name: Some("Jo Doe".into()),
        role,
        attributes: UserAttributes::default(),
    }
}

async fn create_user(app: &TestApp, login: &str, role: Role) -> User {
    app.services
        .user_commands
        .create_user(&system(), create(login, role))
        .await
        .expect("create user")
}

#[tokio::test]
async fn created_users_can_log_in() {
    let app = test_app().await;
    let user = create_user(&app, "jdoe", Role::Editor).await;
    assert_eq!(user.name, "Jo Doe");
    assert!(user.is_active);

    let actor = app
        .services
        .authenticate("jdoe", "correct horse")
        .await
        .unwrap();
    assert_eq!(actor.id, Some(user.id));
    assert_eq!(actor.role, Role::Editor);
    assert!(actor.has_capability("pages", "edit"));
    assert!(!actor.has_capability("pages", "delete"));

    let stored = app.services.user_queries.find_user(&actor, user.id.0).await.unwrap();
    assert_eq!(stored.last_try_at, Some(fixed_now()));
    assert!(app.event_names().contains(&"SLY_USER_ADDED".to_string()));
}

#[tokio::test]
async fn logins_are_unique() {
    let app = test_app().await;
    create_user(&app, "jdoe", Role::Editor).await;

    assert_code(
        app.services
            .user_commands
            .create_user(&system(), create("jdoe", Role::Admin))
            .await,
        "conflict",
    );
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let app = test_app().await;
    let mut command = create("jdoe", Role::Editor);
    command.password = "short".into();

    assert_code(
        app.services.user_commands.create_user(&system(), command).await,
        "validation",
    );
}

#[tokio::test]
async fn wrong_passwords_are_unauthorized_but_recorded() {
    let app = test_app().await;
    let user = create_user(&app, "jdoe", Role::Editor).await;

    assert_code(app.services.authenticate("jdoe", "wrong password").await, "unauthorized");
    assert_code(app.services.authenticate("nobody", "whatever").await, "unauthorized");

    let stored = app
        .services
        .user_queries
        .find_user(&system(), user.id.0)
        .await
        .unwrap();
    assert_eq!(stored.last_try_at, Some(fixed_now()));
}

#[tokio::test]
async fn unreadable_hashes_are_not_reported_as_bad_credentials() {
    let app = test_app().await;
    let user = create_user(&app, "jdoe", Role::Editor).await;
    sqlx::query("UPDATE sly_user SET password = 'corrupt' WHERE id = ?")
        .bind(user.id.0)
        .execute(&app.pool)
        .await
        .unwrap();

    assert_code(
        app.services.authenticate("jdoe", "correct horse").await,
        "infrastructure",
    );
}

#[tokio::test]
async fn disabled_accounts_are_forbidden() {
    let app = test_app().await;
    let user = create_user(&app, "jdoe", Role::Editor).await;
    app.services
        .user_commands
        .edit_user(
            &system(),
            EditUserCommand {
                id: user.id.0,
                name: None,
                description: None,
                is_active: Some(false),
                role: None,
                attributes: None,
            },
        )
        .await
        .unwrap();

    assert_code(app.services.authenticate("jdoe", "correct horse").await, "forbidden");
}

#[tokio::test]
async fn editors_cannot_manage_users() {
    let app = test_app().await;
    assert_code(
        app.services
            .user_commands
            .create_user(&editor(), create("other", Role::Editor))
            .await,
        "forbidden",
    );
    assert_code(app.services.user_queries.list_users(&editor()).await, "forbidden");
}

#[tokio::test]
async fn extra_permissions_extend_the_role() {
    let app = test_app().await;
    let mut command = create("jdoe", Role::Editor);
    command.attributes.permissions = vec!["pages:delete".into()];
    app.services
        .user_commands
        .create_user(&system(), command)
        .await
        .unwrap();

    let actor = app
        .services
        .authenticate("jdoe", "correct horse")
        .await
        .unwrap();
    assert!(actor.has_capability("pages", "delete"));
    assert!(!actor.has_capability("users", "add"));
}

#[tokio::test]
async fn users_change_their_own_password_with_the_current_one() {
    let app = test_app().await;
    let user = create_user(&app, "jdoe", Role::Editor).await;
    let actor = app
        .services
        .authenticate("jdoe", "correct horse")
        .await
        .unwrap();

    assert_code(
        app.services
            .user_commands
            .change_password(
                &actor,
                ChangePasswordCommand {
                    user_id: user.id.0,
                    current_password: Some("not it".into()),
                    new_password: "battery staple".into(),
                },
            )
            .await,
        "unauthorized",
    );

    app.services
        .user_commands
        .change_password(
            &actor,
            ChangePasswordCommand {
                user_id: user.id.0,
                current_password: Some("correct horse".into()),
                new_password: "battery staple".into(),
            },
        )
        .await
        .unwrap();

    assert_code(app.services.authenticate("jdoe", "correct horse").await, "unauthorized");
    app.services
        .authenticate("jdoe", "battery staple")
        .await
        .unwrap();
}

#[tokio::test]
async fn users_cannot_delete_themselves() {
    let app = test_app().await;
    let admin = create_user(&app, "admin", Role::Admin).await;
    let actor = app
        .services
        .authenticate("admin", "correct horse")
        .await
        .unwrap();

    assert_code(
        app.services.user_commands.delete_user(&actor, admin.id.0).await,
        "validation",
    );
    app.services
        .user_commands
        .delete_user(&system(), admin.id.0)
        .await
        .unwrap();
    assert!(app.services.user_queries.list_users(&system()).await.unwrap().is_empty());
}
