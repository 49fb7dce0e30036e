//! Comment endpoints

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::response::{self, Page};

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// GET /api/v1/comments/{videoId}
pub async fn get_video_comments(
    pool: web::Data<PgPool>,
    video_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();

    if !video_repo::video_exists(pool.get_ref(), video_id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }

    let (page, limit, offset) = query.resolve();
    let (comments, total) = tokio::try_join!(
        comment_repo::get_comments_by_video(pool.get_ref(), video_id, limit, offset),
        comment_repo::count_comments_by_video(pool.get_ref(), video_id),
    )?;

    Ok(response::ok(
        Page::new(comments, total, page, limit),
        "Comments fetched successfully",
    ))
}

/// POST /api/v1/comments/{videoId}
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    video_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let video_id = video_id.into_inner();

    if !video_repo::video_exists(pool.get_ref(), video_id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }

    let comment =
        comment_repo::create_comment(pool.get_ref(), video_id, user.0, req.content.trim()).await?;

    Ok(response::created(comment, "Comment added successfully"))
}

/// PATCH /api/v1/comments/c/{commentId}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    comment_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = comment_repo::update_comment(
        pool.get_ref(),
        comment_id.into_inner(),
        user.0,
        req.content.trim(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    Ok(response::ok(comment, "Comment updated successfully"))
}

/// DELETE /api/v1/comments/c/{commentId}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !comment_repo::delete_comment(pool.get_ref(), comment_id.into_inner(), user.0).await? {
        return Err(AppError::NotFound("Comment not found".into()));
    }

    Ok(response::ok(
        serde_json::json!({}),
        "Comment deleted successfully",
    ))
}
