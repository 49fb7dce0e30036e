//! Playlist endpoints

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{playlist_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response;

#[derive(Debug, Deserialize, Validate)]
pub struct PlaylistRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// POST /api/v1/playlists
pub async fn create_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<PlaylistRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let playlist = playlist_repo::create_playlist(
        pool.get_ref(),
        user.0,
        req.name.trim(),
        req.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
    )
    .await?;

    Ok(response::created(playlist, "Playlist created successfully"))
}

/// GET /api/v1/playlists/{playlistId}
pub async fn get_playlist(
    pool: web::Data<PgPool>,
    playlist_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist_id = playlist_id.into_inner();

    let playlist = playlist_repo::get_playlist_by_id(pool.get_ref(), playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;
    let videos = playlist_repo::get_playlist_videos(pool.get_ref(), playlist_id).await?;

    Ok(response::ok(
        json!({ "playlist": playlist, "videos": videos }),
        "Playlist fetched successfully",
    ))
}

/// GET /api/v1/playlists/user/{userId}
pub async fn get_user_playlists(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlists = playlist_repo::get_playlists_by_user(pool.get_ref(), user_id.into_inner()).await?;

    Ok(response::ok(playlists, "Playlists fetched successfully"))
}

/// PATCH /api/v1/playlists/add/{playlistId}/{videoId}
pub async fn add_video_to_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (playlist_id, video_id) = path.into_inner();

    playlist_repo::get_playlist_by_id(pool.get_ref(), playlist_id)
        .await?
        .filter(|p| p.owner_id == user.0)
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;

    if !video_repo::video_exists(pool.get_ref(), video_id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }

    let added = playlist_repo::add_video_to_playlist(pool.get_ref(), playlist_id, video_id).await?;

    let message = if added {
        "Video added to playlist"
    } else {
        "Video already in playlist"
    };
    Ok(response::ok(json!({ "added": added }), message))
}

/// PATCH /api/v1/playlists/remove/{playlistId}/{videoId}
pub async fn remove_video_from_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (playlist_id, video_id) = path.into_inner();

    playlist_repo::get_playlist_by_id(pool.get_ref(), playlist_id)
        .await?
        .filter(|p| p.owner_id == user.0)
        .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;

    if !playlist_repo::remove_video_from_playlist(pool.get_ref(), playlist_id, video_id).await? {
        return Err(AppError::NotFound("Video not found in playlist".into()));
    }

    Ok(response::ok(
        json!({ "removed": true }),
        "Video removed from playlist",
    ))
}

/// PATCH /api/v1/playlists/{playlistId}
pub async fn update_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    playlist_id: web::Path<Uuid>,
    req: web::Json<PlaylistRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let playlist = playlist_repo::update_playlist(
        pool.get_ref(),
        playlist_id.into_inner(),
        user.0,
        req.name.trim(),
        req.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Playlist not found".into()))?;

    Ok(response::ok(playlist, "Playlist updated successfully"))
}

/// DELETE /api/v1/playlists/{playlistId}
pub async fn delete_playlist(
    pool: web::Data<PgPool>,
    user: UserId,
    playlist_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !playlist_repo::delete_playlist(pool.get_ref(), playlist_id.into_inner(), user.0).await? {
        return Err(AppError::NotFound("Playlist not found".into()));
    }

    Ok(response::ok(
        serde_json::json!({}),
        "Playlist deleted successfully",
    ))
}
