use crate::models::{Comment, CommentWithOwner};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, video_id, owner_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_comments_by_video(
    pool: &PgPool,
    video_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithOwner>(
        r#"
        SELECT c.id, c.video_id, c.owner_id, c.content, c.created_at, c.updated_at,
               u.username AS owner_username, u.avatar_url AS owner_avatar,
               (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id) AS likes_count
        FROM comments c
        JOIN users u ON u.id = c.owner_id
        WHERE c.video_id = $1
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(video_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_comments_by_video(pool: &PgPool, video_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await
}

/// Owner-scoped update; None when the row is missing or not owned
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments SET content = $3, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(owner_id)
    .bind(content)
    .fetch_optional(pool)
    .await
}

pub async fn delete_comment(
    pool: &PgPool,
    comment_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND owner_id = $2")
        .bind(comment_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn comment_exists(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)")
        .bind(comment_id)
        .fetch_one(pool)
        .await
}
