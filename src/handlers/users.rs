//! Account profile endpoints: current user, credential and profile
//! updates, channel pages and watch history

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::{history_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::{OptionalUserId, UserId};
use crate::models::PublicUser;
use crate::response::{self, Page};
use crate::security::password;
use crate::services::media_store::MediaStore;
use crate::services::uploads;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "oldPassword is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "newPassword must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "fullName is required"))]
    pub full_name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

/// GET /api/v1/users
pub async fn get_current_user(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(response::ok(
        PublicUser::from(user),
        "Current user fetched successfully",
    ))
}

/// POST /api/v1/users/update/password
pub async fn change_password(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let record = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    password::verify_password(&req.old_password, &record.password_hash)?;

    let new_hash = password::hash_password(&req.new_password)?;
    user_repo::update_password(pool.get_ref(), user.0, &new_hash).await?;

    Ok(response::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// PATCH /api/v1/users/update/details
pub async fn update_account(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let updated = user_repo::update_profile(pool.get_ref(), user.0, &req.full_name, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(response::ok(
        PublicUser::from(updated),
        "Account details updated successfully",
    ))
}

/// PATCH /api/v1/users/update/avatar (multipart: avatar)
pub async fn update_avatar(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<MediaStore>,
    user: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form =
        uploads::spool_multipart(payload, &config.uploads.dir, config.uploads.max_bytes).await?;
    let file = form
        .file("avatar")
        .ok_or_else(|| AppError::Validation("Avatar file is required".into()))?;

    let asset = store
        .upload(file.path(), "avatars", &file.filename, &file.content_type)
        .await?;

    let updated = user_repo::update_avatar(pool.get_ref(), user.0, &asset.url, &asset.key).await;
    match updated {
        Ok(Some((user, old_key))) => {
            // Old asset goes only after the new one is committed.
            store.delete_best_effort(&old_key).await;
            Ok(response::ok(
                PublicUser::from(user),
                "Avatar updated successfully",
            ))
        }
        Ok(None) => {
            store.delete_best_effort(&asset.key).await;
            Err(AppError::NotFound("User not found".into()))
        }
        Err(e) => {
            store.delete_best_effort(&asset.key).await;
            Err(e.into())
        }
    }
}

/// PATCH /api/v1/users/update/coverImage (multipart: coverImage)
pub async fn update_cover_image(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<MediaStore>,
    user: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form =
        uploads::spool_multipart(payload, &config.uploads.dir, config.uploads.max_bytes).await?;
    let file = form
        .file("coverImage")
        .ok_or_else(|| AppError::Validation("Cover image file is required".into()))?;

    let asset = store
        .upload(file.path(), "covers", &file.filename, &file.content_type)
        .await?;

    let updated =
        user_repo::update_cover_image(pool.get_ref(), user.0, &asset.url, &asset.key).await;
    match updated {
        Ok(Some((user, old_key))) => {
            if let Some(old_key) = old_key {
                store.delete_best_effort(&old_key).await;
            }
            Ok(response::ok(
                PublicUser::from(user),
                "Cover image updated successfully",
            ))
        }
        Ok(None) => {
            store.delete_best_effort(&asset.key).await;
            Err(AppError::NotFound("User not found".into()))
        }
        Err(e) => {
            store.delete_best_effort(&asset.key).await;
            Err(e.into())
        }
    }
}

/// GET /api/v1/users/profile/{username}
///
/// Public channel view. When the caller carries a valid token the
/// `isSubscribed` flag reflects their subscription.
pub async fn get_channel_profile(
    pool: web::Data<PgPool>,
    viewer: OptionalUserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = username.into_inner();
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }

    let profile = user_repo::get_channel_profile(pool.get_ref(), username.trim(), viewer.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".into()))?;

    Ok(response::ok(profile, "Channel profile fetched successfully"))
}

/// GET /api/v1/users/history
pub async fn get_watch_history(
    pool: web::Data<PgPool>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (page, limit, offset) = query.resolve();

    let (videos, total) = tokio::try_join!(
        history_repo::get_watch_history(pool.get_ref(), user.0, limit, offset),
        history_repo::count_watch_history(pool.get_ref(), user.0),
    )?;

    Ok(response::ok(
        Page::new(videos, total, page, limit),
        "Watch history fetched successfully",
    ))
}
