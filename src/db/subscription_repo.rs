use crate::models::ChannelCard;
use sqlx::PgPool;
use uuid::Uuid;

/// Flip the subscription state for (channel, subscriber). Returns the state
/// after the toggle: true when the call created the subscription.
pub async fn toggle_subscription(
    pool: &PgPool,
    channel_id: Uuid,
    subscriber_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let deleted =
        sqlx::query("DELETE FROM subscriptions WHERE channel_id = $1 AND subscriber_id = $2")
            .bind(channel_id)
            .bind(subscriber_id)
            .execute(pool)
            .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO subscriptions (id, channel_id, subscriber_id)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(channel_id)
    .bind(subscriber_id)
    .execute(pool)
    .await?;

    Ok(inserted.rows_affected() > 0 || is_subscribed(pool, channel_id, subscriber_id).await?)
}

pub async fn is_subscribed(
    pool: &PgPool,
    channel_id: Uuid,
    subscriber_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE channel_id = $1 AND subscriber_id = $2)",
    )
    .bind(channel_id)
    .bind(subscriber_id)
    .fetch_one(pool)
    .await
}

/// Users subscribed to `channel_id`
pub async fn get_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChannelCard>, sqlx::Error> {
    sqlx::query_as::<_, ChannelCard>(
        r#"
        SELECT u.id, u.username, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(channel_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_subscribers(pool: &PgPool, channel_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
        .bind(channel_id)
        .fetch_one(pool)
        .await
}

/// Channels `subscriber_id` is subscribed to
pub async fn get_subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChannelCard>, sqlx::Error> {
    sqlx::query_as::<_, ChannelCard>(
        r#"
        SELECT u.id, u.username, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(subscriber_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
        .bind(subscriber_id)
        .fetch_one(pool)
        .await
}
