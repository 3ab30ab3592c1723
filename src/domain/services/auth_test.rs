use std::env;
use std::path;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use uuid::Uuid;

use super::AuthService;
use super::TokenStore;
use crate::domain::models::AuthState;
use crate::domain::models::UserRole;

impl AuthService {
    fn with_url(url: String, token_file: path::PathBuf) -> AuthService {
        return AuthService {
            url,
            timeout: "200".to_string(),
            tokens: TokenStore::new(token_file),
            state: AuthState::default(),
            listeners: vec![],
            next_listener: 0,
            epoch: 0,
        };
    }
}

fn scratch_token_file() -> path::PathBuf {
    return env::temp_dir().join(format!("maildeck-token-{}", Uuid::new_v4()));
}

fn user_json(role: &str) -> String {
    return format!(
        r#"{{"id":1,"email":"ada@example.com","name":"Ada","role":"{role}","emailVerified":true}}"#
    );
}

#[tokio::test]
async fn it_logs_in_an_administrator_and_persists_the_token() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(format!(
            r#"{{"user":{user},"token":"tok123"}}"#,
            user = user_json("ADMIN")
        ))
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    let logged_in = service.login("ada@example.com", "hunter2").await;

    assert!(logged_in);
    let state = service.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.user.as_ref().unwrap().role, UserRole::Admin);
    assert_eq!(service.token().as_deref(), Some("tok123"));

    mock.assert();
    service.tokens.clear()?;
    return Ok(());
}

#[tokio::test]
async fn it_refuses_non_administrators_without_storing_a_token() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(format!(
            r#"{{"user":{user},"token":"tok456"}}"#,
            user = user_json("USER")
        ))
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    let logged_in = service.login("ada@example.com", "hunter2").await;

    assert!(!logged_in);
    let state = service.state();
    assert_eq!(state.user, None);
    assert!(state.error.as_ref().unwrap().contains("Administrator"));
    assert_eq!(service.token(), None);

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_reports_rejected_credentials() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users/login")
        .with_status(401)
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    let logged_in = service.login("ada@example.com", "wrong").await;

    assert!(!logged_in);
    assert_eq!(
        service.state().error.as_deref(),
        Some("Invalid email or password")
    );
    mock.assert();
}

#[tokio::test]
async fn it_reports_network_errors_on_login() {
    let mut service = AuthService::with_url(
        "http://127.0.0.1:1".to_string(),
        scratch_token_file(),
    );

    let logged_in = service.login("ada@example.com", "hunter2").await;

    assert!(!logged_in);
    let state = service.state();
    assert!(!state.loading);
    assert!(state.error.as_ref().unwrap().starts_with("Network error:"));
}

#[tokio::test]
async fn it_resolves_signed_out_without_a_network_call() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/api/users/me").expect(0).create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    service.check_auth_status().await;

    let state = service.state();
    assert_eq!(state.user, None);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    mock.assert();
}

#[tokio::test]
async fn it_restores_a_session_from_a_stored_token() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/users/me")
        .match_header("authorization", "Bearer tok123")
        .with_status(200)
        .with_body(format!(
            r#"{{"success":true,"data":{{"user":{user}}}}}"#,
            user = user_json("ADMIN")
        ))
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    service.tokens.save("tok123")?;
    service.check_auth_status().await;

    let state = service.state();
    assert!(!state.loading);
    assert_eq!(state.user.as_ref().unwrap().email, "ada@example.com");

    mock.assert();
    service.tokens.clear()?;
    return Ok(());
}

#[tokio::test]
async fn it_clears_the_token_when_the_session_check_fails() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"Token expired"}"#)
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    service.tokens.save("stale")?;
    service.check_auth_status().await;

    assert_eq!(service.state().user, None);
    assert_eq!(service.token(), None);

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_logs_out_even_when_the_server_errors() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/users/logout")
        .with_status(500)
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    service.tokens.save("tok123")?;
    service.logout().await;

    assert_eq!(service.token(), None);
    assert_eq!(service.state(), &AuthState::default());

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_notifies_subscribers_of_every_transition() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(format!(
            r#"{{"user":{user},"token":"tok123"}}"#,
            user = user_json("ADMIN")
        ))
        .create();

    let mut service = AuthService::with_url(server.url(), scratch_token_file());
    let seen: Arc<Mutex<Vec<AuthState>>> = Arc::new(Mutex::new(vec![]));
    let sink = seen.clone();
    let id = service.subscribe(Box::new(move |state| {
        sink.lock().unwrap().push(state.clone());
    }));

    service.login("ada@example.com", "hunter2").await;

    {
        let states = seen.lock().unwrap();
        assert_eq!(states.len(), 2);
        assert!(states[0].loading);
        assert!(states[1].user.is_some());
    }

    service.unsubscribe(id);
    service.logout().await;
    assert_eq!(seen.lock().unwrap().len(), 2);

    service.tokens.clear()?;
    return Ok(());
}
