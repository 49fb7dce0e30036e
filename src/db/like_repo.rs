use crate::models::VideoWithOwner;
use sqlx::PgPool;
use uuid::Uuid;

/// What a like row points at. Exactly one target column is non-null,
/// enforced by a table CHECK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    fn column(self) -> &'static str {
        match self {
            LikeTarget::Video => "video_id",
            LikeTarget::Comment => "comment_id",
            LikeTarget::Tweet => "tweet_id",
        }
    }
}

/// Flip the like state for (target, user). Returns the state after the
/// toggle: true when the call created a like, false when it removed one.
/// The partial unique indexes make the insert race-safe; a concurrent
/// duplicate insert collapses into ON CONFLICT DO NOTHING.
pub async fn toggle_like(
    pool: &PgPool,
    target: LikeTarget,
    target_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let column = target.column();

    let deleted = sqlx::query(&format!(
        "DELETE FROM likes WHERE {column} = $1 AND liked_by = $2"
    ))
    .bind(target_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    let inserted = sqlx::query(&format!(
        r#"
        INSERT INTO likes (id, {column}, liked_by)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    ))
    .bind(Uuid::new_v4())
    .bind(target_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    // Lost the race to a concurrent toggle; the like exists either way.
    Ok(inserted.rows_affected() > 0 || has_liked(pool, target, target_id, user_id).await?)
}

pub async fn has_liked(
    pool: &PgPool,
    target: LikeTarget,
    target_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let column = target.column();

    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE {column} = $1 AND liked_by = $2)"
    ))
    .bind(target_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Published videos the user has liked, newest like first
pub async fn get_liked_videos(
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
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE l.liked_by = $1 AND l.video_id IS NOT NULL AND v.is_published = TRUE
        ORDER BY l.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_liked_videos(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        WHERE l.liked_by = $1 AND l.video_id IS NOT NULL AND v.is_published = TRUE
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_columns() {
        assert_eq!(LikeTarget::Video.column(), "video_id");
        assert_eq!(LikeTarget::Comment.column(), "comment_id");
        assert_eq!(LikeTarget::Tweet.column(), "tweet_id");
    }
}
