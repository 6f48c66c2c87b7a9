use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wikilens::clients::{ChatCompleter, ClientError, LanguageDetector, Translator, WikipediaSource};
use wikilens::config::Config;
use wikilens::db::Store;
use wikilens::state::{Adapters, SharedState};

/// Default API key seeded by the initial migration
const DEFAULT_API_KEY: &str = wikilens::db::migrator::m20260301_initial::DEFAULT_API_KEY;

struct StubDetector;

#[async_trait]
impl LanguageDetector for StubDetector {
    async fn detect_language(&self, _text: &str) -> Result<String, ClientError> {
        Ok("en".to_string())
    }
}

struct StubWikipedia;

#[async_trait]
impl WikipediaSource for StubWikipedia {
    async fn extract(&self, _language: &str, title: &str) -> Result<Option<String>, ClientError> {
        Ok(Some(format!("{title} is a thing.")))
    }

    async fn lead_image(
        &self,
        _language: &str,
        _title: &str,
    ) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}

struct StubChat;

#[async_trait]
impl ChatCompleter for StubChat {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        Ok(format!("generated for: {prompt}"))
    }
}

struct StubTranslator;

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ClientError> {
        Ok(format!("[{target}] {text}"))
    }
}

struct TestApp {
    router: Router,
    store: Store,
}

async fn spawn_app() -> TestApp {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.storage.avatars_path = std::env::temp_dir()
        .join(format!("wikilens-api-{}", uuid::Uuid::new_v4()))
        .display()
        .to_string();

    let adapters = Adapters {
        detector: Arc::new(StubDetector),
        wikipedia: Arc::new(StubWikipedia),
        chat: Arc::new(StubChat),
        translator: Arc::new(StubTranslator),
    };

    let shared = Arc::new(
        SharedState::with_adapters(config, adapters)
            .await
            .expect("Failed to create shared state"),
    );
    let store = shared.store.clone();
    let state = wikilens::api::create_app_state(shared, None);

    TestApp {
        router: wikilens::api::router(state),
        store,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in as the seeded admin and returns the session cookie pair.
async fn login_cookie(app: &TestApp) -> String {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"email": "admin@localhost", "password": "password"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn cookie_request(
    method: &str,
    uri: &str,
    cookie: &str,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie);

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_creates_session() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"email": "admin@localhost", "password": "nope"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"email": "admin@localhost", "password": "password"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let body = body_json(response).await;
    assert_eq!(body["data"]["api_key"], DEFAULT_API_KEY);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "admin@localhost");
}

#[tokio::test]
async fn test_search_flow() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/search?keyword=Rust"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["keyword"], "Rust");
    assert_eq!(body["data"]["imageSource"], "/images/placeholder.png");
    assert!(
        body["data"]["summary"]
            .as_str()
            .unwrap()
            .ends_with("Rust is a thing.")
    );

    let response = app
        .router
        .clone()
        .oneshot(get("/api/search?keyword=Rust"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/searches/top?limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let top = body["data"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["keyword"], "Rust");
    assert_eq!(top[0]["view_count"], 2);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/history"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["search_text"], "Rust");
}

#[tokio::test]
async fn test_search_requires_keyword() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/search?keyword=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "keyword");
}

#[tokio::test]
async fn test_posts_endpoints() {
    let app = spawn_app().await;
    app.store.create_post("Hello", "First post").await.unwrap();
    app.store.create_post("Second", "Another").await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts/Hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["body"], "First post");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts/Missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/posts/popular")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let popular = body["data"].as_array().unwrap();
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0]["title"], "Hello");
    assert_eq!(popular[0]["view_count"], 1);
}

#[tokio::test]
async fn test_profile_update_clears_verification() {
    let app = spawn_app().await;

    let boundary = "wikilensboundary";
    let form = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nRoot\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\nroot@example.com\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"gender\"\r\n\r\nother\r\n\
         --{boundary}--\r\n"
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/profile")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Root");
    assert_eq!(body["data"]["email"], "root@example.com");
    assert_eq!(body["data"]["gender"], "other");
    assert!(body["data"]["email_verified_at"].is_null());
}

#[tokio::test]
async fn test_profile_rejects_bad_email() {
    let app = spawn_app().await;

    let boundary = "wikilensboundary";
    let form = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nAdmin\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\nnot-an-email\r\n\
         --{boundary}--\r\n"
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/profile")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn test_account_deletion() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/profile",
            &serde_json::json!({"password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["field"], "password");

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/profile",
            &serde_json::json!({"password": "password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(
        app.store
            .get_user_by_email("admin@localhost")
            .await
            .unwrap()
            .is_none()
    );

    let response = app
        .router
        .clone()
        .oneshot(get("/api/profile"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_deletion_ends_session() {
    let app = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(cookie_request(
            "DELETE",
            "/api/profile",
            &cookie,
            Some(&serde_json::json!({"password": "password"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(cookie_request("GET", "/api/profile", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = spawn_app().await;
    let cookie = login_cookie(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(cookie_request("GET", "/api/profile", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(cookie_request("POST", "/api/auth/logout", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(cookie_request("GET", "/api/profile", &cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_and_translate() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            &serde_json::json!({"prompt": "Hi"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["reply"], "generated for: Hi");

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/translate",
            &serde_json::json!({"text": "Hello", "target": "DE"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["text"], "[de] Hello");

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/translate",
            &serde_json::json!({"text": "Hello", "target": "de.evil"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_system_status_is_public() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}
