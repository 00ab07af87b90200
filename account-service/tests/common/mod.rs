#![allow(dead_code)]

use std::sync::Arc;

use account_service::account::service::AccountService;
use account_service::content::service::ContentService;
use account_service::domain::notification::Notification;
use account_service::domain::notification::NotificationError;
use account_service::domain::notification::NotificationSink;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::InMemoryContentRepository;
use account_service::outbound::uploads::LocalImageStore;
use async_trait::async_trait;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenService;
use auth::TokenTtls;
use serde_json::json;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Mutex;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PUBLIC_URL: &str = "http://frontend.test";

/// Captures every notification instead of delivering it.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub tokens: Arc<TokenService>,
    pub notifier: RecordingNotifier,
    pub uploads: TempDir,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let uploads = tempfile::tempdir().expect("Failed to create uploads dir");

        let accounts = InMemoryAccountRepository::new();
        let contents = InMemoryContentRepository::new(accounts.clone());
        let notifier = RecordingNotifier::default();
        let images = Arc::new(LocalImageStore::new(uploads.path()));
        let tokens = Arc::new(TokenService::new(TEST_SECRET, TokenTtls::default()));

        // Cheap Argon2 parameters keep the suite fast.
        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Invalid hash cost");

        let account_service = Arc::new(AccountService::new(
            Arc::new(accounts),
            Arc::new(notifier.clone()),
            Arc::clone(&images),
            Arc::clone(&tokens),
            hasher,
            PUBLIC_URL,
        ));
        let content_service = Arc::new(ContentService::new(Arc::new(contents), images));

        let router = create_router(
            account_service,
            content_service,
            Arc::clone(&tokens),
            uploads.path(),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            tokens,
            notifier,
            uploads,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
                "confirmPassword": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Token from the most recent email sent to `to` with the given subject.
    pub async fn token_from_last_email(&self, to: &str, subject: &str) -> String {
        let sent = self.notifier.sent().await;
        let mail = sent
            .iter()
            .rev()
            .find(|n| n.to == to && n.subject == subject)
            .unwrap_or_else(|| panic!("No '{}' email sent to {}", subject, to));
        extract_token(&mail.html_body)
    }

    /// Register, verify and log in; returns the session token.
    pub async fn verified_session(&self, username: &str, email: &str, password: &str) -> String {
        let response = self.register(username, email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let token = self.token_from_last_email(email, "Verify your account").await;
        let response = self
            .post_authenticated("/auth/verification", &token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Login returned no token")
            .to_string()
    }
}

/// Pull the `token` query parameter out of an emailed link.
pub fn extract_token(html: &str) -> String {
    let start = html.find("?token=").expect("No token in email") + "?token=".len();
    html[start..]
        .chars()
        .take_while(|c| *c != '"' && !c.is_whitespace())
        .collect()
}
