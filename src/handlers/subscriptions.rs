//! Channel subscription toggle and listings

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::response::{self, Page};

/// POST /api/v1/subscriptions/c/{channelId}
pub async fn toggle_subscription(
    pool: web::Data<PgPool>,
    user: UserId,
    channel_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = channel_id.into_inner();

    if channel_id == user.0 {
        return Err(AppError::Validation(
            "You cannot subscribe to your own channel".into(),
        ));
    }
    if user_repo::find_by_id(pool.get_ref(), channel_id).await?.is_none() {
        return Err(AppError::NotFound("Channel does not exist".into()));
    }

    let subscribed =
        subscription_repo::toggle_subscription(pool.get_ref(), channel_id, user.0).await?;

    let message = if subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(response::ok(json!({ "subscribed": subscribed }), message))
}

/// GET /api/v1/subscriptions/c/{channelId}
pub async fn get_channel_subscribers(
    pool: web::Data<PgPool>,
    channel_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let channel_id = channel_id.into_inner();

    if user_repo::find_by_id(pool.get_ref(), channel_id).await?.is_none() {
        return Err(AppError::NotFound("Channel does not exist".into()));
    }

    let (page, limit, offset) = query.resolve();
    let (subscribers, total) = tokio::try_join!(
        subscription_repo::get_subscribers(pool.get_ref(), channel_id, limit, offset),
        subscription_repo::count_subscribers(pool.get_ref(), channel_id),
    )?;

    Ok(response::ok(
        Page::new(subscribers, total, page, limit),
        "Subscribers fetched successfully",
    ))
}

/// GET /api/v1/subscriptions/u/{subscriberId}
pub async fn get_subscribed_channels(
    pool: web::Data<PgPool>,
    subscriber_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let subscriber_id = subscriber_id.into_inner();

    if user_repo::find_by_id(pool.get_ref(), subscriber_id).await?.is_none() {
        return Err(AppError::NotFound("User does not exist".into()));
    }

    let (page, limit, offset) = query.resolve();
    let (channels, total) = tokio::try_join!(
        subscription_repo::get_subscribed_channels(pool.get_ref(), subscriber_id, limit, offset),
        subscription_repo::count_subscribed_channels(pool.get_ref(), subscriber_id),
    )?;

    Ok(response::ok(
        Page::new(channels, total, page, limit),
        "Subscribed channels fetched successfully",
    ))
}
