//! Like toggles and liked-video listing

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::like_repo::{self, LikeTarget};
use crate::db::{comment_repo, tweet_repo, video_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::response::{self, Page};

async fn toggle(
    pool: &PgPool,
    target: LikeTarget,
    target_id: Uuid,
    user_id: Uuid,
) -> Result<HttpResponse> {
    let liked = like_repo::toggle_like(pool, target, target_id, user_id).await?;

    let message = if liked { "Liked successfully" } else { "Like removed" };
    Ok(response::ok(json!({ "liked": liked }), message))
}

/// POST /api/v1/likes/toggle/video/{videoId}
pub async fn toggle_video_like(
    pool: web::Data<PgPool>,
    user: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    if !video_repo::video_exists(pool.get_ref(), video_id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }
    toggle(pool.get_ref(), LikeTarget::Video, video_id, user.0).await
}

/// POST /api/v1/likes/toggle/comment/{commentId}
pub async fn toggle_comment_like(
    pool: web::Data<PgPool>,
    user: UserId,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = comment_id.into_inner();
    if !comment_repo::comment_exists(pool.get_ref(), comment_id).await? {
        return Err(AppError::NotFound("Comment not found".into()));
    }
    toggle(pool.get_ref(), LikeTarget::Comment, comment_id, user.0).await
}

/// POST /api/v1/likes/toggle/tweet/{tweetId}
pub async fn toggle_tweet_like(
    pool: web::Data<PgPool>,
    user: UserId,
    tweet_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = tweet_id.into_inner();
    if !tweet_repo::tweet_exists(pool.get_ref(), tweet_id).await? {
        return Err(AppError::NotFound("Tweet not found".into()));
    }
    toggle(pool.get_ref(), LikeTarget::Tweet, tweet_id, user.0).await
}

/// GET /api/v1/likes/videos
pub async fn get_liked_videos(
    pool: web::Data<PgPool>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (page, limit, offset) = query.resolve();

    let (videos, total) = tokio::try_join!(
        like_repo::get_liked_videos(pool.get_ref(), user.0, limit, offset),
        like_repo::count_liked_videos(pool.get_ref(), user.0),
    )?;

    Ok(response::ok(
        Page::new(videos, total, page, limit),
        "Liked videos fetched successfully",
    ))
}
