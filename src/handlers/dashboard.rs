//! Owner dashboard: channel aggregates and the full (drafts included)
//! video list

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::{dashboard_repo, subscription_repo};
use crate::error::Result;
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::models::ChannelStats;
use crate::response::{self, Page};

/// GET /api/v1/dashboard/stats
pub async fn get_channel_stats(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let ((total_videos, total_views), total_subscribers, total_likes) = tokio::try_join!(
        dashboard_repo::get_video_stats(pool.get_ref(), user.0),
        subscription_repo::count_subscribers(pool.get_ref(), user.0),
        dashboard_repo::count_video_likes(pool.get_ref(), user.0),
    )?;

    Ok(response::ok(
        ChannelStats {
            total_videos,
            total_views,
            total_subscribers,
            total_likes,
        },
        "Channel stats fetched successfully",
    ))
}

/// GET /api/v1/dashboard/videos
pub async fn get_channel_videos(
    pool: web::Data<PgPool>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (page, limit, offset) = query.resolve();

    let (videos, total) = tokio::try_join!(
        dashboard_repo::get_channel_videos(pool.get_ref(), user.0, limit, offset),
        dashboard_repo::count_channel_videos(pool.get_ref(), user.0),
    )?;

    Ok(response::ok(
        Page::new(videos, total, page, limit),
        "Channel videos fetched successfully",
    ))
}
