mod common;

use auth::TokenPurpose;
use common::extract_token;
use common::TestApp;
use common::PUBLIC_URL;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_register_verify_login_flow() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "alice@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body(response).await;
    assert_eq!(created["status_code"], 201);
    assert_eq!(created["data"]["username"], "alice");
    assert_eq!(created["data"]["email"], "alice@x.com");
    assert_eq!(created["data"]["isVerified"], false);
    assert!(created["data"].get("password").is_none());

    let sent = app.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@x.com");
    assert!(sent[0]
        .html_body
        .contains(&format!("{}/auth/verification?token=", PUBLIC_URL)));

    // Unverified accounts cannot log in
    let response = app.login("alice@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(response).await["message"], "Account not verified");

    let token = extract_token(&sent[0].html_body);
    let response = app
        .post_authenticated("/auth/verification", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await["data"]["isVerified"], true);

    let response = app.login("alice@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in = body(response).await;
    assert_eq!(logged_in["data"]["user"]["username"], "alice");
    let session = logged_in["data"]["token"].as_str().unwrap();
    assert_eq!(
        app.tokens.verify(session, TokenPurpose::Session).unwrap(),
        created["data"]["id"].to_string()
    );

    let response = app
        .get_authenticated("/auth/get-user", session)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body(response).await;
    assert_eq!(profile["data"]["email"], "alice@x.com");
    assert_eq!(profile["data"]["isVerified"], true);
}

#[tokio::test]
async fn test_register_conflicts_name_the_field() {
    let app = TestApp::spawn().await;
    app.register("alice", "alice@x.com", "secret1").await;

    let response = app.register("alice2", "ALICE@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body(response).await;
    assert_eq!(error["message"], "Email already exists");
    assert_eq!(error["fields"], json!(["email"]));

    let response = app.register("alice", "other@x.com", "secret1").await;
    assert_eq!(body(response).await["message"], "Username already exists");

    let response = app.register("alice", "alice@x.com", "secret1").await;
    assert_eq!(
        body(response).await["message"],
        "Email and username already exist"
    );

    // Nothing beyond the first registration was emailed
    assert_eq!(app.notifier.sent().await.len(), 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::spawn().await;

    let response = app.register("alice", "alice@x.com", "12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["password"]));

    let response = app
        .post("/auth")
        .json(&json!({
            "username": "alice",
            "email": "alice@x.com",
            "password": "secret1",
            "confirmPassword": "secret2",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["confirmPassword"]));

    let response = app.register("alice", "not-an-email", "secret1").await;
    assert_eq!(body(response).await["fields"], json!(["email"]));

    let response = app
        .post("/auth")
        .json(&json!({
            "username": "alice",
            "email": "alice@x.com",
            "password": "secret1",
            "fullname": "x".repeat(101),
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["fullname"]));

    assert!(app.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_login_does_not_reveal_which_credential_failed() {
    let app = TestApp::spawn().await;
    app.verified_session("alice", "alice@x.com", "secret1").await;

    let wrong_password = app.login("alice@x.com", "wrong-pass").await;
    let unknown_email = app.login("nobody@x.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(wrong_password).await, body(unknown_email).await);
}

#[tokio::test]
async fn test_resend_verification() {
    let app = TestApp::spawn().await;
    app.register("alice", "alice@x.com", "secret1").await;

    let response = app
        .post("/auth/resend-verification")
        .json(&json!({ "email": "alice@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.notifier.sent().await.len(), 2);

    let response = app
        .post("/auth/resend-verification")
        .json(&json!({ "email": "ghost@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let token = app
        .token_from_last_email("alice@x.com", "Verify your account")
        .await;
    app.post_authenticated("/auth/verification", &token)
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post("/auth/resend-verification")
        .json(&json!({ "email": "alice@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forget_and_reset_password() {
    let app = TestApp::spawn().await;
    app.verified_session("alice", "alice@x.com", "secret1").await;

    let response = app
        .post("/auth/forget-password")
        .json(&json!({ "email": "alice@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let token = app
        .token_from_last_email("alice@x.com", "Reset your password")
        .await;

    let response = app
        .post_authenticated("/auth/reset-password", &token)
        .json(&json!({ "newPassword": "abc", "confirmPassword": "abc" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["password"]));

    let response = app
        .post_authenticated("/auth/reset-password", &token)
        .json(&json!({ "newPassword": "newsecret", "confirmPassword": "different" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_authenticated("/auth/reset-password", &token)
        .json(&json!({ "newPassword": "newsecret", "confirmPassword": "newsecret" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        app.login("alice@x.com", "secret1").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("alice@x.com", "newsecret").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_forget_password_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/forget-password")
        .json(&json!({ "email": "ghost@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_tokens_only_open_their_own_route_group() {
    let app = TestApp::spawn().await;
    let session = app.verified_session("alice", "alice@x.com", "secret1").await;
    let verification = app
        .token_from_last_email("alice@x.com", "Verify your account")
        .await;

    // Session token cannot reset a password
    let response = app
        .post_authenticated("/auth/reset-password", &session)
        .json(&json!({ "newPassword": "hijacked", "confirmPassword": "hijacked" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Verification token is not a session
    let response = app
        .get_authenticated("/auth/get-user", &verification)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_missing_or_malformed_authorization() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/auth/get-user")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get("/auth/get-user")
        .header("Authorization", "Token abc")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get_authenticated("/auth/get-user", "not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_profile() {
    let app = TestApp::spawn().await;
    let session = app.verified_session("alice", "alice@x.com", "secret1").await;
    app.verified_session("bob", "bob@x.com", "secret1").await;

    let form = Form::new()
        .text("fullname", "Alice Liddell")
        .text("bio", "Down the rabbit hole")
        .part(
            "image",
            Part::bytes(vec![0x89, b'P', b'N', b'G'])
                .file_name("avatar.png")
                .mime_str("image/png")
                .unwrap(),
        );
    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body(response).await;
    assert_eq!(updated["data"]["username"], "alice");
    assert_eq!(updated["data"]["fullname"], "Alice Liddell");
    assert_eq!(updated["data"]["bio"], "Down the rabbit hole");

    let image = updated["data"]["image"].as_str().unwrap().to_string();
    assert!(image.starts_with("/uploads/") && image.ends_with(".png"));
    let response = app.get(&image).send().await.expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Taking another user's name is a conflict
    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(Form::new().text("username", "bob"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["message"], "Username already exists");

    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(Form::new().text("bio", "x".repeat(51)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["bio"]));

    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(Form::new().text("fullname", "x".repeat(101)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["fullname"]));

    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(Form::new().text("password", "changed1"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.login("alice@x.com", "changed1").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_edit_profile_rejects_non_image_upload() {
    let app = TestApp::spawn().await;
    let session = app.verified_session("alice", "alice@x.com", "secret1").await;

    let form = Form::new().part(
        "image",
        Part::bytes(b"plain text".to_vec())
            .file_name("notes.txt")
            .mime_str("text/plain")
            .unwrap(),
    );
    let response = app
        .post_authenticated("/auth/edit-user", &session)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["fields"], json!(["image"]));
}

#[tokio::test]
async fn test_edit_profile_rejects_markup_disguised_as_image() {
    let app = TestApp::spawn().await;
    let session = app.verified_session("alice", "alice@x.com", "secret1").await;

    for content_type in ["image/html", "image/svg+xml"] {
        let form = Form::new().part(
            "image",
            Part::bytes(b"<script>alert(document.domain)</script>".to_vec())
                .file_name("avatar")
                .mime_str(content_type)
                .unwrap(),
        );
        let response = app
            .post_authenticated("/auth/edit-user", &session)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(response).await["fields"], json!(["image"]));
    }

    let stored = std::fs::read_dir(app.uploads.path()).unwrap().count();
    assert_eq!(stored, 0);
}
