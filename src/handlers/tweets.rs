//! Tweet endpoints

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{tweet_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::middleware::UserId;
use crate::response::{self, Page};

#[derive(Debug, Deserialize, Validate)]
pub struct TweetRequest {
    #[validate(length(min = 1, max = 500, message = "content must be 1-500 characters"))]
    pub content: String,
}

/// POST /api/v1/tweets
pub async fn create_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let tweet = tweet_repo::create_tweet(pool.get_ref(), user.0, req.content.trim()).await?;

    Ok(response::created(tweet, "Tweet created successfully"))
}

/// GET /api/v1/tweets/user/{username}
pub async fn get_user_tweets(
    pool: web::Data<PgPool>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let owner = user_repo::find_by_username(pool.get_ref(), username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

    let (page, limit, offset) = query.resolve();
    let (tweets, total) = tokio::try_join!(
        tweet_repo::get_tweets_by_owner(pool.get_ref(), owner.id, limit, offset),
        tweet_repo::count_tweets_by_owner(pool.get_ref(), owner.id),
    )?;

    Ok(response::ok(
        Page::new(tweets, total, page, limit),
        "Tweets fetched successfully",
    ))
}

/// PATCH /api/v1/tweets/{tweetId}
pub async fn update_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    tweet_id: web::Path<Uuid>,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let tweet =
        tweet_repo::update_tweet(pool.get_ref(), tweet_id.into_inner(), user.0, req.content.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;

    Ok(response::ok(tweet, "Tweet updated successfully"))
}

/// DELETE /api/v1/tweets/{tweetId}
pub async fn delete_tweet(
    pool: web::Data<PgPool>,
    user: UserId,
    tweet_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !tweet_repo::delete_tweet(pool.get_ref(), tweet_id.into_inner(), user.0).await? {
        return Err(AppError::NotFound("Tweet not found".into()));
    }

    Ok(response::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}
