use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

use super::*;

const APPLICATION_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

// Tests that point application default credentials at a key file share one
// process-wide environment variable.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Writes a service-account key file whose token endpoint is `server`.
fn write_key_file(server: &MockServer, name: &str) -> PathBuf {
    let key = json!({
        "type": "service_account",
        "project_id": "proj-1",
        "private_key_id": "key-1",
        "private_key": include_str!("../testdata/test_service_account_key.pem"),
        "client_email": "notifier@proj-1.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": format!("{}/token", server.uri()),
    });

    let file = std::env::temp_dir().join(format!(
        "build-notifier-{name}-{}.json",
        std::process::id()
    ));
    std::fs::write(&file, key.to_string()).unwrap();
    file
}

async fn token_endpoint(status: u16, expected_calls: impl Into<Times>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "access_token": "ya29.key-file",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

#[test]
fn test_access_token_debug_is_redacted() {
    let token = AccessToken::new("secret-value");
    assert!(!format!("{token:?}").contains("secret-value"));
    assert_eq!(token.secret(), "secret-value");
}

#[tokio::test]
async fn test_static_provider_returns_configured_token() {
    let provider = StaticTokenProvider::new("abc");
    assert_eq!(provider.access_token().await.unwrap().secret(), "abc");
}

#[tokio::test]
async fn test_discovery_prefers_static_token_without_network() {
    let provider = discover_credentials(Some("abc".to_string())).await.unwrap();

    assert_eq!(provider.access_token().await.unwrap().secret(), "abc");
}

#[tokio::test]
async fn test_discovery_reads_key_file_from_environment() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let server = token_endpoint(200, 1..).await;
    let key_file = write_key_file(&server, "valid");
    std::env::set_var(APPLICATION_CREDENTIALS_ENV, &key_file);

    let provider = discover_credentials(None).await.unwrap();
    let token = provider.access_token().await.unwrap();

    std::env::remove_var(APPLICATION_CREDENTIALS_ENV);
    let _ = std::fs::remove_file(&key_file);
    assert_eq!(token.secret(), "ya29.key-file");
}

#[tokio::test]
async fn test_discovery_fails_when_key_file_cannot_issue_token() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let server = token_endpoint(500, 1..).await;
    let key_file = write_key_file(&server, "rejected");
    std::env::set_var(APPLICATION_CREDENTIALS_ENV, &key_file);

    let result = discover_credentials(Some(String::new())).await;

    std::env::remove_var(APPLICATION_CREDENTIALS_ENV);
    let _ = std::fs::remove_file(&key_file);
    assert!(matches!(result, Err(ConfigurationError::Credentials { .. })));
}
