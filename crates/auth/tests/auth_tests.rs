use std::sync::{Arc, Mutex};

use house_keeper_auth::{AuthClient, AuthError, AuthStateChange, NewUser, SessionStore, UserUpdate};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AuthClient {
    AuthClient::new(&server.uri(), reqwest::Client::new(), SessionStore::new())
}

fn user_body() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "alice@example.com",
        "username": "alice",
        "is_active": true,
        "first_name": "Alice",
        "last_name": "Archer",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn register_posts_json_and_returns_the_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_string_contains("alice@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    let auth = client_for(&server);
    let new_user = NewUser::new("alice@example.com", "alice", "secret", "Alice", "Archer");

    let user = auth.register(&new_user).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.username, "alice");
    // Registration alone must not create a session.
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn login_sends_the_password_form_and_stores_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let auth = client_for(&server);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _subscription = auth.store().on_auth_state_change(move |change| {
        sink.lock().unwrap().push(change);
    });

    let session = auth.login("alice", "secret").await.unwrap();

    assert_eq!(session.access_token, "test-token");
    assert!(auth.is_authenticated());
    assert_eq!(*events.lock().unwrap(), vec![AuthStateChange::SignedIn]);
}

#[tokio::test]
async fn login_with_bad_credentials_is_reported_as_such() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Incorrect username or password"
            })),
        )
        .mount(&server)
        .await;

    let auth = client_for(&server);
    let result = auth.login("alice", "wrong").await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn current_user_presents_the_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    let auth = client_for(&server);
    auth.login("alice", "secret").await.unwrap();

    let user = auth.current_user().await.unwrap();

    assert_eq!(user.email, "alice@example.com");
}

#[tokio::test]
async fn current_user_without_a_session_fails_locally() {
    let server = MockServer::start().await;
    let auth = client_for(&server);

    let result = auth.current_user().await;

    assert!(matches!(result, Err(AuthError::MissingSession)));
    // No mock was mounted, so any network call would have errored differently.
}

#[tokio::test]
async fn a_rejected_token_drops_the_session_and_signals_sign_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "stale-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let auth = client_for(&server);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _subscription = auth.store().on_auth_state_change(move |change| {
        sink.lock().unwrap().push(change);
    });

    auth.login("alice", "secret").await.unwrap();
    let result = auth.current_user().await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
    assert!(!auth.is_authenticated());
    assert_eq!(
        *events.lock().unwrap(),
        vec![AuthStateChange::SignedIn, AuthStateChange::SignedOut]
    );
}

#[tokio::test]
async fn update_user_broadcasts_user_updated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/auth/me"))
        .and(body_string_contains("first_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    let auth = client_for(&server);
    auth.login("alice", "secret").await.unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _subscription = auth.store().on_auth_state_change(move |change| {
        sink.lock().unwrap().push(change);
    });

    let update = UserUpdate::new().with_first_name("Alice");
    auth.update_user(&update).await.unwrap();

    assert_eq!(*events.lock().unwrap(), vec![AuthStateChange::UserUpdated]);
}

#[tokio::test]
async fn sign_out_is_local_and_broadcasts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let auth = client_for(&server);
    auth.login("alice", "secret").await.unwrap();

    auth.sign_out();

    assert!(!auth.is_authenticated());
    assert!(auth.session().is_none());
}
