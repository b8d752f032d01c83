use super::*;
use crate::api::ApiClient;
use crate::web::http::MockTransport;
use crate::web::{MemoryStore, SessionStore};
use bloodlink_shared::{Role, Session};
use leptos::prelude::*;
use serde_json::json;
use std::rc::Rc;

// =========================================================
// Shared Helpers
// =========================================================

const BASE: &str = "http://api.test";

fn client_with_mock() -> (ApiClient, Rc<MockTransport>) {
    let transport = Rc::new(MockTransport::new());
    let client = ApiClient::with_transport(BASE.to_string(), transport.clone());
    (client, transport)
}

fn mock_login(transport: &MockTransport, token: &str, username: &str, role: &str) {
    transport.mock_response(
        "http://api.test/token",
        200,
        json!({"access_token": token, "token_type": "bearer"}),
    );
    transport.mock_response(
        "http://api.test/users/me",
        200,
        json!({
            "_id": "u1",
            "username": username,
            "email": format!("{username}@example.com"),
            "full_name": username,
            "role": role,
        }),
    );
}

fn test_context() -> AuthContext {
    let owner = Owner::new();
    owner.set();
    std::mem::forget(owner);
    AuthContext::new()
}

// =========================================================
// Atomic Session Establishment
// =========================================================

#[tokio::test]
async fn test_establish_session_commits_token_profile_and_role() {
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    mock_login(&transport, "tok-1", "alice", "hospital");

    let session = establish_session(&client, &store, "alice", "pw")
        .await
        .unwrap();
    assert_eq!(session.token, "tok-1");
    assert_eq!(session.username, "alice");
    assert_eq!(session.role, Role::Hospital);

    // 存储里是完整的三元组
    assert_eq!(store.load(), Some(session));

    // 顺序：先换令牌，再用新令牌拉资料
    let requests = transport.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, "http://api.test/token");
    assert_eq!(requests[1].0, "http://api.test/users/me");
    assert_eq!(
        requests[1].2.get("Authorization").map(String::as_str),
        Some("Bearer tok-1")
    );
}

#[tokio::test]
async fn test_token_failure_leaves_store_empty() {
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    transport.mock_response(
        "http://api.test/token",
        401,
        json!({"detail": "Incorrect username or password"}),
    );

    let err = establish_session(&client, &store, "alice", "wrong")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(store.load(), None);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_profile_failure_after_token_leaves_store_empty() {
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    transport.mock_response(
        "http://api.test/token",
        200,
        json!({"access_token": "tok-1", "token_type": "bearer"}),
    );
    transport.mock_response(
        "http://api.test/users/me",
        500,
        json!({"detail": "database unavailable"}),
    );

    let err = establish_session(&client, &store, "alice", "pw")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        crate::error::ApiError::Api {
            status: 500,
            detail: "database unavailable".to_string()
        }
    );
    // 令牌已经拿到了，但会话没有提交，存储保持干净
    assert_eq!(store.load(), None);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_unavailable_storage_degrades_to_memory_session() {
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    store.fail_saves.set(true);
    mock_login(&transport, "tok-1", "alice", "user");

    let session = establish_session(&client, &store, "alice", "pw")
        .await
        .unwrap();
    assert_eq!(session.username, "alice");
    assert_eq!(store.load(), None);
}

// =========================================================
// State Machine
// =========================================================

#[tokio::test]
async fn test_login_reaches_authenticated_state() {
    let ctx = test_context();
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    mock_login(&transport, "tok-2", "bob", "paramedic");

    assert_eq!(ctx.state.get_untracked(), AuthState::Anonymous);

    let ok = login(&ctx, &client, &store, "bob", "pw").await;
    assert!(ok);

    let state = ctx.state.get_untracked();
    assert!(state.is_authenticated());
    assert_eq!(state.role(), Some(Role::Paramedic));
    assert!(store.load().is_some());
}

#[tokio::test]
async fn test_failed_login_sets_failed_state() {
    let ctx = test_context();
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    transport.mock_response(
        "http://api.test/token",
        401,
        json!({"detail": "Incorrect username or password"}),
    );

    let ok = login(&ctx, &client, &store, "bob", "nope").await;
    assert!(!ok);
    assert_eq!(
        ctx.state.get_untracked(),
        AuthState::Failed("Incorrect username or password".to_string())
    );
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn test_logout_clears_store_and_state() {
    let ctx = test_context();
    let (client, transport) = client_with_mock();
    let store = MemoryStore::new();
    mock_login(&transport, "tok-3", "carol", "user");

    assert!(login(&ctx, &client, &store, "carol", "pw").await);
    assert!(store.load().is_some());

    logout(&ctx, &store);
    assert_eq!(ctx.state.get_untracked(), AuthState::Anonymous);
    assert_eq!(store.load(), None);
}

// =========================================================
// Startup Rehydration
// =========================================================

#[test]
fn test_init_auth_restores_persisted_session() {
    let ctx = test_context();
    let session = Session {
        token: "tok-4".to_string(),
        username: "dave".to_string(),
        role: Role::BloodBank,
    };
    let store = MemoryStore::preloaded(session.clone());

    init_auth(&ctx, &store);
    assert_eq!(
        ctx.state.get_untracked(),
        AuthState::Authenticated(session)
    );
}

#[test]
fn test_init_auth_without_session_stays_anonymous() {
    let ctx = test_context();
    let store = MemoryStore::new();

    init_auth(&ctx, &store);
    assert_eq!(ctx.state.get_untracked(), AuthState::Anonymous);
}
