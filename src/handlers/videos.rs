//! Video publish, search, playback metadata and owner mutations

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{history_repo, video_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::{OptionalUserId, UserId};
use crate::response::{self, Page};
use crate::services::media_store::MediaStore;
use crate::services::uploads;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
}

/// POST /api/v1/videos (multipart: videoFile, thumbnail, title,
/// description?, duration?)
///
/// Uploads run sequentially; a thumbnail failure compensates the video
/// upload, and an insert failure compensates both.
pub async fn publish_video(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<MediaStore>,
    user: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form =
        uploads::spool_multipart(payload, &config.uploads.dir, config.uploads.max_bytes).await?;

    let title = form.text("title").unwrap_or("").trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    let description = form.text("description").map(|d| d.trim().to_string());
    let duration: i64 = form
        .text("duration")
        .and_then(|d| d.trim().parse().ok())
        .unwrap_or(0);

    let video_file = form
        .file("videoFile")
        .ok_or_else(|| AppError::Validation("Video file is required".into()))?;
    let thumbnail_file = form
        .file("thumbnail")
        .ok_or_else(|| AppError::Validation("Thumbnail file is required".into()))?;

    let video_asset = store
        .upload(
            video_file.path(),
            "videos",
            &video_file.filename,
            &video_file.content_type,
        )
        .await?;

    let thumbnail_asset = match store
        .upload(
            thumbnail_file.path(),
            "thumbnails",
            &thumbnail_file.filename,
            &thumbnail_file.content_type,
        )
        .await
    {
        Ok(asset) => asset,
        Err(e) => {
            store.delete_best_effort(&video_asset.key).await;
            return Err(e);
        }
    };

    let created = video_repo::create_video(
        pool.get_ref(),
        user.0,
        &video_asset.url,
        &video_asset.key,
        &thumbnail_asset.url,
        &thumbnail_asset.key,
        &title,
        description.as_deref().filter(|d| !d.is_empty()),
        duration,
    )
    .await;

    let video = match created {
        Ok(video) => video,
        Err(e) => {
            store.delete_best_effort(&video_asset.key).await;
            store.delete_best_effort(&thumbnail_asset.key).await;
            return Err(e.into());
        }
    };

    tracing::info!(video_id = %video.id, owner_id = %user.0, "video published");

    Ok(response::created(video, "Video published successfully"))
}

/// GET /api/v1/videos
///
/// Requires a text query or an owner filter; published videos only.
pub async fn get_all_videos(
    pool: web::Data<PgPool>,
    query: web::Query<VideoListQuery>,
) -> Result<HttpResponse> {
    let text = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());
    if text.is_none() && query.user_id.is_none() {
        return Err(AppError::Validation(
            "A search query or userId filter is required".into(),
        ));
    }

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit, offset) = page_query.resolve();
    let sort_by = query.sort_by.as_deref().unwrap_or("created_at");
    let sort_type = query.sort_type.as_deref().unwrap_or("desc");

    let (videos, total) = tokio::try_join!(
        video_repo::list_videos(
            pool.get_ref(),
            text,
            query.user_id,
            sort_by,
            sort_type,
            limit,
            offset,
        ),
        video_repo::count_videos(pool.get_ref(), text, query.user_id),
    )?;

    if videos.is_empty() {
        return Err(AppError::NotFound("Videos not found".into()));
    }

    Ok(response::ok(
        Page::new(videos, total, page, limit),
        "Videos fetched successfully",
    ))
}

/// GET /api/v1/videos/{videoId}
///
/// Counts the view and, for authenticated callers, records watch history.
pub async fn get_video(
    pool: web::Data<PgPool>,
    viewer: OptionalUserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();

    let mut video = video_repo::get_video_by_id(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    // Drafts are visible to their owner only.
    if !video.is_published && viewer.0 != Some(video.owner_id) {
        return Err(AppError::NotFound("Video not found".into()));
    }

    video_repo::increment_views(pool.get_ref(), video_id).await?;
    video.views += 1;

    if let Some(viewer_id) = viewer.0 {
        history_repo::record_watch(pool.get_ref(), viewer_id, video_id).await?;
    }

    Ok(response::ok(video, "Video fetched successfully"))
}

/// PATCH /api/v1/videos/{videoId} (multipart: title?, description?,
/// thumbnail?)
pub async fn update_video(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<MediaStore>,
    user: UserId,
    video_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let form =
        uploads::spool_multipart(payload, &config.uploads.dir, config.uploads.max_bytes).await?;

    let title = form
        .text("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);
    let description = form
        .text("description")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from);
    let thumbnail_file = form.file("thumbnail");

    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::Validation(
            "At least one of title, description or thumbnail is required".into(),
        ));
    }

    // Ownership resolves before anything is written to the object store.
    video_repo::get_video_by_id(pool.get_ref(), video_id)
        .await?
        .filter(|v| v.owner_id == user.0)
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    let new_thumbnail = match thumbnail_file {
        Some(file) => Some(
            store
                .upload(file.path(), "thumbnails", &file.filename, &file.content_type)
                .await?,
        ),
        None => None,
    };

    let updated = video_repo::update_video_details(
        pool.get_ref(),
        video_id,
        user.0,
        title.as_deref(),
        description.as_deref(),
        new_thumbnail.as_ref().map(|a| (a.url.as_str(), a.key.as_str())),
    )
    .await;

    match updated {
        Ok(Some((video, old_thumbnail_key))) => {
            if let Some(old_key) = old_thumbnail_key {
                store.delete_best_effort(&old_key).await;
            }
            Ok(response::ok(video, "Video updated successfully"))
        }
        Ok(None) => {
            if let Some(asset) = &new_thumbnail {
                store.delete_best_effort(&asset.key).await;
            }
            Err(AppError::NotFound("Video not found".into()))
        }
        Err(e) => {
            if let Some(asset) = &new_thumbnail {
                store.delete_best_effort(&asset.key).await;
            }
            Err(e.into())
        }
    }
}

/// DELETE /api/v1/videos/{videoId}
///
/// Remote objects must be gone before the row is removed; a failed remote
/// delete aborts the whole operation.
pub async fn delete_video(
    pool: web::Data<PgPool>,
    store: web::Data<MediaStore>,
    user: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();

    let video = video_repo::get_video_by_id(pool.get_ref(), video_id)
        .await?
        .filter(|v| v.owner_id == user.0)
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    store.delete(&video.video_key).await?;
    store.delete(&video.thumbnail_key).await?;

    if !video_repo::delete_video(pool.get_ref(), video_id, user.0).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }

    tracing::info!(video_id = %video_id, owner_id = %user.0, "video deleted");

    Ok(response::ok(
        serde_json::json!({}),
        "Video deleted successfully",
    ))
}

/// PATCH /api/v1/videos/toggle/publish/{videoId}
pub async fn toggle_publish_status(
    pool: web::Data<PgPool>,
    user: UserId,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video = video_repo::toggle_publish_status(pool.get_ref(), video_id.into_inner(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;

    Ok(response::ok(video, "Publish status toggled successfully"))
}
