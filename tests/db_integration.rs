//! Database-backed behavior tests: toggle round-trips, pagination windows,
//! upload abort paths and credential errors. Each test provisions its own
//! schema from the crate's migrations. Handlers are invoked directly with
//! constructed extractors, so no HTTP server is involved.

use actix_multipart::Multipart;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{test, web, FromRequest, ResponseError};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use vidtube_api::config::{
    AppConfig, Config, CorsConfig, DatabaseConfig, JwtConfig, S3Config, UploadConfig,
};
use vidtube_api::db::like_repo::LikeTarget;
use vidtube_api::db::{comment_repo, like_repo, subscription_repo, user_repo, video_repo};
use vidtube_api::error::AppError;
use vidtube_api::handlers::users::ChangePasswordRequest;
use vidtube_api::handlers::{auth, comments, users, videos, PageQuery};
use vidtube_api::middleware::UserId;
use vidtube_api::models::{User, Video};
use vidtube_api::security::password;
use vidtube_api::services::media_store::MediaStore;

const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";

/// Config whose object-store endpoint refuses connections, so any upload
/// attempt fails fast.
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
            access_secret: "db-test-access".into(),
            refresh_secret: "db-test-refresh".into(),
            access_token_ttl: 3600,
            refresh_token_ttl: 86400,
            cookie_secure: false,
        },
        s3: S3Config {
            bucket_name: "test-bucket".into(),
            region: "us-east-1".into(),
            aws_access_key_id: "unused".into(),
            aws_secret_access_key: "unused".into(),
            endpoint: Some("http://127.0.0.1:1".into()),
            cdn_base_url: "https://cdn.test".into(),
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
            max_age: 3600,
        },
        uploads: UploadConfig {
            dir: std::env::temp_dir().display().to_string(),
            max_bytes: 1024 * 1024,
        },
    }
}

async fn seed_user(pool: &PgPool, username: &str) -> User {
    user_repo::create_user(
        pool,
        username,
        &format!("{username}@example.com"),
        "Test User",
        "$argon2id$not-a-real-hash",
        "https://cdn.test/avatars/a.png",
        "avatars/a.png",
        None,
        None,
    )
    .await
    .unwrap()
}

async fn seed_video(pool: &PgPool, owner_id: Uuid, title: &str) -> Video {
    video_repo::create_video(
        pool,
        owner_id,
        "https://cdn.test/videos/v.mp4",
        "videos/v.mp4",
        "https://cdn.test/thumbnails/t.png",
        "thumbnails/t.png",
        title,
        None,
        10,
    )
    .await
    .unwrap()
}

/// Build a `Multipart` extractor from a raw body, the way a request would
async fn multipart_payload(body: String) -> Multipart {
    let (req, mut payload) = test::TestRequest::default()
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_http_parts();

    Multipart::from_request(&req, &mut payload).await.unwrap()
}

#[sqlx::test]
async fn like_toggle_round_trips(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let liker = seed_user(&pool, "liker").await;
    let video = seed_video(&pool, owner.id, "clip").await;

    assert!(like_repo::toggle_like(&pool, LikeTarget::Video, video.id, liker.id)
        .await
        .unwrap());
    assert!(like_repo::has_liked(&pool, LikeTarget::Video, video.id, liker.id)
        .await
        .unwrap());

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = $1 AND liked_by = $2")
            .bind(video.id)
            .bind(liker.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);

    // Second toggle returns to the original state and leaves no row.
    assert!(!like_repo::toggle_like(&pool, LikeTarget::Video, video.id, liker.id)
        .await
        .unwrap());
    assert!(!like_repo::has_liked(&pool, LikeTarget::Video, video.id, liker.id)
        .await
        .unwrap());

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = $1 AND liked_by = $2")
            .bind(video.id)
            .bind(liker.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test]
async fn subscription_toggle_round_trips(pool: PgPool) {
    let channel = seed_user(&pool, "channel").await;
    let viewer = seed_user(&pool, "viewer").await;

    assert!(subscription_repo::toggle_subscription(&pool, channel.id, viewer.id)
        .await
        .unwrap());
    assert!(subscription_repo::is_subscribed(&pool, channel.id, viewer.id)
        .await
        .unwrap());
    assert_eq!(
        subscription_repo::count_subscribers(&pool, channel.id)
            .await
            .unwrap(),
        1
    );

    assert!(!subscription_repo::toggle_subscription(&pool, channel.id, viewer.id)
        .await
        .unwrap());
    assert_eq!(
        subscription_repo::count_subscribers(&pool, channel.id)
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test]
async fn comment_listing_pages_by_window(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let video = seed_video(&pool, author.id, "clip").await;
    for i in 0..25 {
        comment_repo::create_comment(&pool, video.id, author.id, &format!("comment {i}"))
            .await
            .unwrap();
    }

    let resp = comments::get_video_comments(
        web::Data::new(pool.clone()),
        web::Path::from(video.id),
        web::Query(PageQuery {
            page: Some(2),
            limit: Some(10),
        }),
    )
    .await
    .unwrap();

    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["limit"], 10);
    assert_eq!(json["data"]["totalDocs"], 25);
    assert_eq!(json["data"]["totalPages"], 3);
    assert_eq!(json["data"]["docs"].as_array().unwrap().len(), 10);

    let resp = comments::get_video_comments(
        web::Data::new(pool.clone()),
        web::Path::from(video.id),
        web::Query(PageQuery {
            page: Some(3),
            limit: Some(10),
        }),
    )
    .await
    .unwrap();

    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["docs"].as_array().unwrap().len(), 5);
}

#[sqlx::test]
async fn wrong_old_password_is_unauthorized(pool: PgPool) {
    let hash = password::hash_password("CorrectHorse1!").unwrap();
    let user = user_repo::create_user(
        &pool,
        "chai",
        "chai@example.com",
        "Chai Aur Code",
        &hash,
        "https://cdn.test/avatars/a.png",
        "avatars/a.png",
        None,
        None,
    )
    .await
    .unwrap();

    let err = users::change_password(
        web::Data::new(pool.clone()),
        UserId(user.id),
        web::Json(ChangePasswordRequest {
            old_password: "wrong-password".into(),
            new_password: "BrandNewPass1!".into(),
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

    // The stored hash is untouched.
    let record = user_repo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(password::verify_password("CorrectHorse1!", &record.password_hash).is_ok());
}

#[sqlx::test]
async fn duplicate_registration_reads_as_conflict(pool: PgPool) {
    seed_user(&pool, "dup").await;

    let err = user_repo::create_user(
        &pool,
        "dup",
        "dup@example.com",
        "Test User",
        "$argon2id$not-a-real-hash",
        "https://cdn.test/avatars/a.png",
        "avatars/a.png",
        None,
        None,
    )
    .await
    .unwrap_err();

    let err = auth::create_user_error(err);
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[sqlx::test]
async fn publish_aborts_cleanly_when_upload_fails(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let config = test_config();
    let store = MediaStore::new(&config.s3).await.unwrap();

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         Broken upload\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"videoFile\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n\
         fake video bytes\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"thumbnail\"; filename=\"thumb.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fake image bytes\r\n\
         --{BOUNDARY}--\r\n"
    );
    let payload = multipart_payload(body).await;

    let err = videos::publish_video(
        web::Data::new(pool.clone()),
        web::Data::new(config),
        web::Data::new(store),
        UserId(creator.id),
        payload,
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // A failed upload must not leave a half-published row behind.
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE owner_id = $1")
        .bind(creator.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test]
async fn update_video_checks_ownership_before_uploading(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let intruder = seed_user(&pool, "intruder").await;
    let video = seed_video(&pool, owner.id, "clip").await;
    let config = test_config();
    let store = MediaStore::new(&config.s3).await.unwrap();

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"thumbnail\"; filename=\"thumb.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fake image bytes\r\n\
         --{BOUNDARY}--\r\n"
    );
    let payload = multipart_payload(body).await;

    // Not-owned resolves as NotFound before the store is touched; an
    // attempted upload would surface as 500 against this endpoint.
    let err = videos::update_video(
        web::Data::new(pool.clone()),
        web::Data::new(config),
        web::Data::new(store),
        UserId(intruder.id),
        web::Path::from(video.id),
        payload,
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let unchanged = video_repo::get_video_by_id(&pool, video.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.thumbnail_key, video.thumbnail_key);
}
