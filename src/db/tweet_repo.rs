use crate::models::{Tweet, TweetWithOwner};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_tweet(
    pool: &PgPool,
    owner_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(
        r#"
        INSERT INTO tweets (id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_tweets_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<TweetWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, TweetWithOwner>(
        r#"
        SELECT t.id, t.owner_id, t.content, t.created_at, t.updated_at,
               u.username AS owner_username, u.avatar_url AS owner_avatar,
               (SELECT COUNT(*) FROM likes l WHERE l.tweet_id = t.id) AS likes_count
        FROM tweets t
        JOIN users u ON u.id = t.owner_id
        WHERE t.owner_id = $1
        ORDER BY t.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_tweets_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tweets WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(pool)
        .await
}

/// Owner-scoped update; None when the row is missing or not owned
pub async fn update_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(
        r#"
        UPDATE tweets SET content = $3, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(tweet_id)
    .bind(owner_id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

pub async fn delete_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tweets WHERE id = $1 AND owner_id = $2")
        .bind(tweet_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn tweet_exists(pool: &PgPool, tweet_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tweets WHERE id = $1)")
        .bind(tweet_id)
        .fetch_one(pool)
        .await
}
