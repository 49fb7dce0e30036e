//! Contract tests for the HTTP surface: auth guard rejections, request
//! validation, and the response envelope. Uses a lazy pool so no live
//! Postgres is needed; every request here fails before a query runs.

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

use vidtube_api::config::{
    AppConfig, Config, CorsConfig, DatabaseConfig, JwtConfig, S3Config, UploadConfig,
};
use vidtube_api::routes::configure_routes;
use vidtube_api::security::jwt;
use vidtube_api::services::media_store::MediaStore;

fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unused".into(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            access_secret: "contract-test-access".into(),
            refresh_secret: "contract-test-refresh".into(),
            access_token_ttl: 3600,
            refresh_token_ttl: 86400,
            cookie_secure: false,
        },
        s3: S3Config {
            bucket_name: "unused".into(),
            region: "us-east-1".into(),
            aws_access_key_id: "unused".into(),
            aws_secret_access_key: "unused".into(),
            endpoint: None,
            cdn_base_url: "https://cdn.test".into(),
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
            max_age: 3600,
        },
        uploads: UploadConfig {
            dir: std::env::temp_dir().display().to_string(),
            max_bytes: 1024,
        },
    }
}

macro_rules! test_app {
    () => {{
        let config = test_config();
        jwt::initialize_keys(&config.jwt);
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database.url)
            .expect("lazy pool");
        let store = MediaStore::new(&config.s3).await.expect("media store");
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(store))
                .app_data(web::Data::new(config))
                .configure(configure_routes),
        )
        .await
    }};
}

#[actix_web::test]
async fn protected_route_rejects_anonymous_request() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn dashboard_requires_authentication() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/stats")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_requires_username_or_email() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "password": "SecurePass123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username or email is required");
}

#[actix_web::test]
async fn login_rejects_mixed_case_username() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "username": "Chai", "password": "SecurePass123!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Username must be lowercase");
}

#[actix_web::test]
async fn login_rejects_empty_password() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "username": "chai", "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn refresh_without_token_is_unauthorized() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/users/refreshtoken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized request");
}

#[actix_web::test]
async fn refresh_rejects_garbage_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/users/refreshtoken")
        .set_json(json!({ "refreshToken": "not-a-jwt" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn video_listing_requires_query_or_owner_filter() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/videos").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["errors"].is_array());
}

#[actix_web::test]
async fn mutating_routes_are_guarded() {
    let app = test_app!();

    for (method, uri) in [
        ("POST", "/api/v1/tweets"),
        ("POST", "/api/v1/videos"),
        ("POST", "/api/v1/playlists"),
        (
            "POST",
            "/api/v1/likes/toggle/video/00000000-0000-0000-0000-000000000001",
        ),
        (
            "POST",
            "/api/v1/subscriptions/c/00000000-0000-0000-0000-000000000001",
        ),
        ("POST", "/api/v1/users/logout"),
        ("GET", "/api/v1/users/history"),
    ] {
        let req = match method {
            "POST" => test::TestRequest::post(),
            _ => test::TestRequest::get(),
        }
        .uri(uri)
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}
