use crate::models::{ChannelProfile, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, avatar_key, \
     cover_image_url, cover_image_key, refresh_token, created_at, updated_at";

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
    avatar_url: &str,
    avatar_key: &str,
    cover_image_url: Option<&str>,
    cover_image_key: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, full_name, password_hash,
                           avatar_url, avatar_key, cover_image_url, cover_image_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(avatar_url)
    .bind(avatar_key)
    .bind(cover_image_url)
    .bind(cover_image_key)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Login lookup: either identifier matches
pub async fn find_by_username_or_email(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2"
    ))
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn exists_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Store the issued refresh token (or NULL on logout)
pub async fn set_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    refresh_token: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(refresh_token)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    user_id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET full_name = $2, email = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(full_name)
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Swap the avatar, returning the previous object key for cleanup
pub async fn update_avatar(
    pool: &PgPool,
    user_id: Uuid,
    avatar_url: &str,
    avatar_key: &str,
) -> Result<Option<(User, String)>, sqlx::Error> {
    let old_key =
        sqlx::query_scalar::<_, String>("SELECT avatar_key FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let Some(old_key) = old_key else {
        return Ok(None);
    };

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET avatar_url = $2, avatar_key = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(avatar_url)
    .bind(avatar_key)
    .fetch_one(pool)
    .await?;

    Ok(Some((user, old_key)))
}

/// Swap the cover image, returning the previous object key (if any)
pub async fn update_cover_image(
    pool: &PgPool,
    user_id: Uuid,
    cover_image_url: &str,
    cover_image_key: &str,
) -> Result<Option<(User, Option<String>)>, sqlx::Error> {
    let old_key = sqlx::query_scalar::<_, Option<String>>(
        "SELECT cover_image_key FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(old_key) = old_key else {
        return Ok(None);
    };

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET cover_image_url = $2, cover_image_key = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(cover_image_url)
    .bind(cover_image_key)
    .fetch_one(pool)
    .await?;

    Ok(Some((user, old_key)))
}

/// Channel page for `username`, with subscription aggregates computed
/// relative to `viewer_id` (NULL viewer is never subscribed).
pub async fn get_channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Option<Uuid>,
) -> Result<Option<ChannelProfile>, sqlx::Error> {
    sqlx::query_as::<_, ChannelProfile>(
        r#"
        SELECT u.id, u.username, u.email, u.full_name, u.avatar_url,
               u.cover_image_url, u.created_at,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id)
                   AS subscribers_count,
               (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id)
                   AS channels_subscribed_to_count,
               EXISTS(SELECT 1 FROM subscriptions s
                      WHERE s.channel_id = u.id AND s.subscriber_id = $2)
                   AS is_subscribed
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await
}
