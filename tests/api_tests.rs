use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use critiq::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("critiq-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    // No upstream key: review requests must fail locally, before any call.
    config.openai.api_key = None;

    let state = critiq::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    critiq::api::router(state).await
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Logs in and returns the session cookie to attach to later requests.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    // The tones list is only consumed by the post-login UI, so it sits
    // behind the session gate like everything else.
    for uri in [
        "/api/system/status",
        "/api/users",
        "/api/auth/me",
        "/api/review/tones",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/review",
            json!({ "code": "print('hi')" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;

    // Wrong password for an existing user.
    let wrong_password = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "admin", "password": "nope-nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = body_json(wrong_password).await;

    // Unknown username.
    let unknown_user = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "nobody", "password": "nope-nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user_body = body_json(unknown_user).await;

    assert_eq!(wrong_password_body, unknown_user_body);
}

#[tokio::test]
async fn test_bootstrap_admin_login_and_me() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["display_name"], "Administrator");
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_round_trip() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    // Create alice.
    let response = app
        .clone()
        .oneshot({
            let mut req = json_request(
                "POST",
                "/api/users",
                json!({
                    "username": "alice",
                    "display_name": "Alice",
                    "password": "pw123-secret",
                    "role": "user"
                }),
            );
            req.headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Duplicate username is rejected, not overwritten.
    let response = app
        .clone()
        .oneshot({
            let mut req = json_request(
                "POST",
                "/api/users",
                json!({
                    "username": "alice",
                    "display_name": "Other Alice",
                    "password": "different-pw",
                    "role": "admin"
                }),
            );
            req.headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Listing includes alice's public fields and no password material.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let users = body["data"].as_array().unwrap();
    let alice = users
        .iter()
        .find(|u| u["username"] == "alice")
        .expect("alice should be listed");
    assert_eq!(alice["display_name"], "Alice");
    assert_eq!(alice["role"], "user");
    let raw = serde_json::to_string(&body).unwrap();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("$argon2"));

    // Alice can log in with her original password (duplicate create
    // must not have replaced it).
    let alice_cookie = login(&app, "alice", "pw123-secret").await;

    // Non-admin sessions are denied user management, explicitly.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, &alice_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Delete alice, then she is gone.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/alice")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/alice")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_display_name_with_markup_is_stored_verbatim() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    // Display names are free text; the server stores and returns them
    // as data and the UI escapes them when rendering.
    let markup = "<img src=x onerror=alert(1)>";
    let response = app
        .clone()
        .oneshot({
            let mut req = json_request(
                "POST",
                "/api/users",
                json!({
                    "username": "mallory",
                    "display_name": markup,
                    "password": "pw123-secret",
                    "role": "user"
                }),
            );
            req.headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["display_name"], markup);
}

#[tokio::test]
async fn test_admin_account_cannot_be_deleted() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/admin")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The account is still there.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|u| u["username"] == "admin")
    );
}

#[tokio::test]
async fn test_review_input_validation_happens_locally() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let with_cookie = |mut req: Request<Body>| {
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        req
    };

    // Over the 6000-char default cap: rejected before any upstream
    // call (the app has no API key, so reaching the client would
    // produce a different error).
    let response = app
        .clone()
        .oneshot(with_cookie(json_request(
            "POST",
            "/api/review",
            json!({ "code": "x".repeat(6001), "tone": "Supportive" }),
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("6000 characters limit")
    );

    // Whitespace-only code.
    let response = app
        .clone()
        .oneshot(with_cookie(json_request(
            "POST",
            "/api/review",
            json!({ "code": "   \n " }),
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Disallowed upload extension.
    let response = app
        .clone()
        .oneshot(with_cookie(json_request(
            "POST",
            "/api/review",
            json!({ "code": "print('hi')", "filename": "tool.exe" }),
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tones_endpoint_lists_the_three_presets() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/review/tones")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Supportive", "Direct", "Humorous"]);
}

#[tokio::test]
async fn test_system_status_reports_config() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["api_key_configured"], false);
    assert_eq!(body["data"]["max_code_chars"], 6000);
    assert_eq!(body["data"]["user_count"], 1);
}
