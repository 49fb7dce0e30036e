use crate::models::VideoWithOwner;
use sqlx::PgPool;
use uuid::Uuid;

/// Record a watch. Re-watching refreshes the timestamp instead of adding
/// a second row.
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Watched videos, most recent first
pub async fn get_watch_history(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, VideoWithOwner>(
        r#"
        SELECT v.id, v.owner_id, v.video_url, v.thumbnail_url, v.title,
               v.description, v.views, v.duration, v.is_published, v.created_at,
               u.username AS owner_username, u.avatar_url AS owner_avatar
        FROM watch_history h
        JOIN videos v ON v.id = h.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE h.user_id = $1
        ORDER BY h.watched_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_watch_history(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM watch_history WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
