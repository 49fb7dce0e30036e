use crate::models::{Playlist, VideoWithOwner};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_playlist(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"
        INSERT INTO playlists (id, owner_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, name, description, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn get_playlist_by_id(
    pool: &PgPool,
    playlist_id: Uuid,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        "SELECT id, owner_id, name, description, created_at, updated_at \
         FROM playlists WHERE id = $1",
    )
    .bind(playlist_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_playlists_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"
        SELECT id, owner_id, name, description, created_at, updated_at
        FROM playlists
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Videos in a playlist, in insertion order
pub async fn get_playlist_videos(
    pool: &PgPool,
    playlist_id: Uuid,
) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, VideoWithOwner>(
        r#"
        SELECT v.id, v.owner_id, v.video_url, v.thumbnail_url, v.title,
               v.description, v.views, v.duration, v.is_published, v.created_at,
               u.username AS owner_username, u.avatar_url AS owner_avatar
        FROM playlist_videos pv
        JOIN videos v ON v.id = pv.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE pv.playlist_id = $1
        ORDER BY pv.position ASC
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await
}

/// Append a video; idempotent for videos already in the playlist.
/// Returns false when the video was already present.
pub async fn add_video_to_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO playlist_videos (playlist_id, video_id, position)
        VALUES ($1, $2,
                (SELECT COALESCE(MAX(position), 0) + 1
                 FROM playlist_videos WHERE playlist_id = $1))
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(inserted.rows_affected() > 0)
}

pub async fn remove_video_from_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
            .bind(playlist_id)
            .bind(video_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Owner-scoped update; None when the row is missing or not owned
pub async fn update_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    owner_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"
        UPDATE playlists SET name = $3, description = $4, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id, owner_id, name, description, created_at, updated_at
        "#,
    )
    .bind(playlist_id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn delete_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = $1 AND owner_id = $2")
        .bind(playlist_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
