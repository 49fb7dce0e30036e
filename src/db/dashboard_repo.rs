use crate::models::Video;
use sqlx::PgPool;
use uuid::Uuid;

/// Video count and summed views for a channel. Missing rows aggregate to 0.
pub async fn get_video_stats(pool: &PgPool, channel_id: Uuid) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(views), 0) FROM videos WHERE owner_id = $1",
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await
}

/// Likes received across all of the channel's videos
pub async fn count_video_likes(pool: &PgPool, channel_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        WHERE v.owner_id = $1
        "#,
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await
}

/// Every video the channel owns, drafts included
pub async fn get_channel_videos(
    pool: &PgPool,
    channel_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        SELECT id, owner_id, video_url, video_key, thumbnail_url, thumbnail_key,
               title, description, views, duration, is_published, created_at, updated_at
        FROM videos
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(channel_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_channel_videos(pool: &PgPool, channel_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE owner_id = $1")
        .bind(channel_id)
        .fetch_one(pool)
        .await
}
