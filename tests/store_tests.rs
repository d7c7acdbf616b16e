//! Credential store properties, exercised directly against `Store`.

use critiq::config::SecurityConfig;
use critiq::db::Store;
use critiq::models::user::Role;

fn temp_db_url(tag: &str) -> String {
    let path = std::env::temp_dir().join(format!("critiq-store-{tag}-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", path.display())
}

#[tokio::test]
async fn test_initialize_seeds_exactly_one_admin_and_is_idempotent() {
    let db_url = temp_db_url("seed");

    let store = Store::new(&db_url).await.expect("first connect");
    drop(store);

    // Reconnecting must not reseed or fail.
    let store = Store::new(&db_url).await.expect("second connect");

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "admin");
    assert_eq!(users[0].role, Role::Admin);
}

#[tokio::test]
async fn test_create_then_verify_round_trip() {
    let store = Store::new(&temp_db_url("verify")).await.unwrap();
    let security = SecurityConfig::default();

    store
        .insert_user("alice", "Alice", "pw123-secret", Role::User, &security)
        .await
        .unwrap();

    let user = store
        .verify_credentials("alice", "pw123-secret")
        .await
        .unwrap()
        .expect("correct password should verify");
    assert_eq!(user.display_name, "Alice");
    assert_eq!(user.role, Role::User);

    assert!(
        store
            .verify_credentials("alice", "wrong-password")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_credentials("nobody", "pw123-secret")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_listing_never_exposes_password_material() {
    let store = Store::new(&temp_db_url("list")).await.unwrap();
    let security = SecurityConfig::default();

    store
        .insert_user("alice", "Alice", "pw123-secret", Role::User, &security)
        .await
        .unwrap();

    let users = store.list_users().await.unwrap();
    let alice = users.iter().find(|u| u.username == "alice").unwrap();

    // The repository's public type has no hash field at all; the debug
    // rendering is the closest thing to a leak vector.
    let rendered = format!("{alice:?}");
    assert!(!rendered.contains("pw123-secret"));
    assert!(!rendered.contains("$argon2"));
}

#[tokio::test]
async fn test_duplicate_username_rejected_by_unique_index() {
    let store = Store::new(&temp_db_url("dup")).await.unwrap();
    let security = SecurityConfig::default();

    store
        .insert_user("carol", "Carol", "pw123-secret", Role::User, &security)
        .await
        .unwrap();

    let duplicate = store
        .insert_user("carol", "Other Carol", "other-pw", Role::Admin, &security)
        .await;
    assert!(duplicate.is_err());

    // The original credentials are untouched.
    let user = store
        .verify_credentials("carol", "pw123-secret")
        .await
        .unwrap()
        .expect("original account intact");
    assert_eq!(user.display_name, "Carol");
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_was_removed() {
    let store = Store::new(&temp_db_url("delete")).await.unwrap();
    let security = SecurityConfig::default();

    store
        .insert_user("dave", "Dave", "pw123-secret", Role::User, &security)
        .await
        .unwrap();

    assert!(store.delete_user("dave").await.unwrap());
    assert!(!store.delete_user("dave").await.unwrap());
    assert!(store.get_user_by_username("dave").await.unwrap().is_none());
}

#[tokio::test]
async fn test_password_update_replaces_hash() {
    let store = Store::new(&temp_db_url("passwd")).await.unwrap();
    let security = SecurityConfig::default();

    store
        .update_user_password("admin", "a-new-password", &security)
        .await
        .unwrap();

    assert!(
        store
            .verify_credentials("admin", "admin")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_credentials("admin", "a-new-password")
            .await
            .unwrap()
            .is_some()
    );
}
