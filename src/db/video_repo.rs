use crate::models::{Video, VideoWithOwner};
use sqlx::PgPool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, owner_id, video_url, video_key, thumbnail_url, thumbnail_key, \
     title, description, views, duration, is_published, created_at, updated_at";

/// Sort columns accepted by the listing endpoint. Anything else falls back
/// to created_at so user input never reaches the SQL text.
fn sort_column(requested: &str) -> &'static str {
    match requested {
        "views" => "views",
        "duration" => "duration",
        "title" => "title",
        _ => "created_at",
    }
}

fn sort_direction(requested: &str) -> &'static str {
    if requested.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    video_url: &str,
    video_key: &str,
    thumbnail_url: &str,
    thumbnail_key: &str,
    title: &str,
    description: Option<&str>,
    duration: i64,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (id, owner_id, video_url, video_key, thumbnail_url,
                            thumbnail_key, title, description, duration)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {VIDEO_COLUMNS}
        "#,
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(video_url)
    .bind(video_key)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .bind(title)
    .bind(description)
    .bind(duration)
    .fetch_one(pool)
    .await
}

pub async fn get_video_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Published-video search with optional text query and owner filter
pub async fn list_videos(
    pool: &PgPool,
    query: Option<&str>,
    owner_id: Option<Uuid>,
    sort_by: &str,
    sort_type: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT v.id, v.owner_id, v.video_url, v.thumbnail_url, v.title,
               v.description, v.views, v.duration, v.is_published, v.created_at,
               u.username AS owner_username, u.avatar_url AS owner_avatar
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.is_published = TRUE
          AND ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%'
               OR v.description ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        ORDER BY v.{} {}
        LIMIT $3 OFFSET $4
        "#,
        sort_column(sort_by),
        sort_direction(sort_type),
    );

    sqlx::query_as::<_, VideoWithOwner>(&sql)
        .bind(query)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_videos(
    pool: &PgPool,
    query: Option<&str>,
    owner_id: Option<Uuid>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM videos v
        WHERE v.is_published = TRUE
          AND ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%'
               OR v.description ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        "#,
    )
    .bind(query)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn video_exists(pool: &PgPool, video_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
        .bind(video_id)
        .fetch_one(pool)
        .await
}

/// Owner-scoped partial update; None when the row is missing or not owned.
/// Absent fields keep their stored value.
pub async fn update_video_details(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    thumbnail: Option<(&str, &str)>,
) -> Result<Option<(Video, Option<String>)>, sqlx::Error> {
    let old_thumbnail_key = sqlx::query_scalar::<_, String>(
        "SELECT thumbnail_key FROM videos WHERE id = $1 AND owner_id = $2",
    )
    .bind(video_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    let Some(old_thumbnail_key) = old_thumbnail_key else {
        return Ok(None);
    };

    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = COALESCE($3, title),
            description = COALESCE($4, description),
            thumbnail_url = COALESCE($5, thumbnail_url),
            thumbnail_key = COALESCE($6, thumbnail_key),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING {VIDEO_COLUMNS}
        "#,
    ))
    .bind(video_id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail.map(|(url, _)| url))
    .bind(thumbnail.map(|(_, key)| key))
    .fetch_optional(pool)
    .await?;

    // Report the replaced key only when a new thumbnail landed.
    Ok(video.map(|v| (v, thumbnail.map(|_| old_thumbnail_key))))
}

pub async fn toggle_publish_status(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING {VIDEO_COLUMNS}
        "#,
    ))
    .bind(video_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_video(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1 AND owner_id = $2")
        .bind(video_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_rejects_unknown_input() {
        assert_eq!(sort_column("views"), "views");
        assert_eq!(sort_column("created_at"), "created_at");
        assert_eq!(sort_column("; DROP TABLE videos"), "created_at");
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(sort_direction("asc"), "ASC");
        assert_eq!(sort_direction("ASC"), "ASC");
        assert_eq!(sort_direction("desc"), "DESC");
        assert_eq!(sort_direction("sideways"), "DESC");
    }
}
