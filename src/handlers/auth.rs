//! Registration, login, token refresh and logout

use actix_multipart::Multipart;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::jwt_auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::middleware::UserId;
use crate::models::PublicUser;
use crate::response;
use crate::security::{jwt, password};
use crate::services::media_store::{MediaAsset, MediaStore};
use crate::services::uploads;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn auth_cookie(name: &str, value: &str, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_string(), value.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(ttl_secs))
        .finish()
}

fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.to_string(), "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

/// A racing registration can slip past the existence check; the unique
/// constraint reports it as a duplicate, not a server fault.
pub fn create_user_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict("User with email or username already exists".into())
        }
        _ => e.into(),
    }
}

fn token_cookies(pair: &jwt::TokenPair, config: &Config) -> (Cookie<'static>, Cookie<'static>) {
    (
        auth_cookie(
            ACCESS_TOKEN_COOKIE,
            &pair.access_token,
            config.jwt.access_token_ttl,
            config.jwt.cookie_secure,
        ),
        auth_cookie(
            REFRESH_TOKEN_COOKIE,
            &pair.refresh_token,
            config.jwt.refresh_token_ttl,
            config.jwt.cookie_secure,
        ),
    )
}

/// POST /api/v1/users/register (multipart)
///
/// Text fields: fullName, email, username, password. Files: avatar
/// (required), coverImage (optional). Remote uploads that precede a failure
/// are compensated with best-effort deletes.
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<MediaStore>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form =
        uploads::spool_multipart(payload, &config.uploads.dir, config.uploads.max_bytes).await?;

    let full_name = form.text("fullName").unwrap_or("").trim().to_string();
    let email = form.text("email").unwrap_or("").trim().to_string();
    let username = form.text("username").unwrap_or("").trim().to_string();
    let password = form.text("password").unwrap_or("").to_string();

    if full_name.is_empty() || email.is_empty() || username.is_empty() || password.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if username.chars().any(|c| c.is_uppercase()) {
        return Err(AppError::Validation("Username must be lowercase".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    if user_repo::exists_by_username_or_email(pool.get_ref(), &username, &email).await? {
        return Err(AppError::Conflict(
            "User with email or username already exists".into(),
        ));
    }

    let avatar_file = form
        .file("avatar")
        .ok_or_else(|| AppError::Validation("Avatar file is required".into()))?;

    let password_hash = password::hash_password(&password)?;

    let avatar = store
        .upload(
            avatar_file.path(),
            "avatars",
            &avatar_file.filename,
            &avatar_file.content_type,
        )
        .await?;

    let cover: Option<MediaAsset> = match form.file("coverImage") {
        Some(file) => {
            match store
                .upload(file.path(), "covers", &file.filename, &file.content_type)
                .await
            {
                Ok(asset) => Some(asset),
                Err(e) => {
                    store.delete_best_effort(&avatar.key).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let created = user_repo::create_user(
        pool.get_ref(),
        &username,
        &email,
        &full_name,
        &password_hash,
        &avatar.url,
        &avatar.key,
        cover.as_ref().map(|c| c.url.as_str()),
        cover.as_ref().map(|c| c.key.as_str()),
    )
    .await;

    let user = match created {
        Ok(user) => user,
        Err(e) => {
            store.delete_best_effort(&avatar.key).await;
            if let Some(cover) = &cover {
                store.delete_best_effort(&cover.key).await;
            }
            return Err(create_user_error(e));
        }
    };

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(response::created(
        PublicUser::from(user),
        "User registered successfully",
    ))
}

/// POST /api/v1/users/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    if req.username.is_none() && req.email.is_none() {
        return Err(AppError::Validation("Username or email is required".into()));
    }
    if let Some(username) = req.username.as_deref() {
        if username.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::Validation("Username must be lowercase".into()));
        }
    }

    let user = user_repo::find_by_username_or_email(
        pool.get_ref(),
        req.username.as_deref(),
        req.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

    password::verify_password(&req.password, &user.password_hash)?;

    let pair = jwt::generate_token_pair(user.id, &user.email, &user.username)?;
    user_repo::set_refresh_token(pool.get_ref(), user.id, Some(&pair.refresh_token)).await?;

    let (access_cookie, refresh_cookie) = token_cookies(&pair, &config);

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(response::ApiResponse::success(
            200,
            json!({
                "user": PublicUser::from(user),
                "accessToken": pair.access_token,
                "refreshToken": pair.refresh_token,
            }),
            "User logged in successfully",
        )))
}

/// POST /api/v1/users/refreshtoken
///
/// Token from the refreshToken cookie or the JSON body. The presented token
/// must match the one stored on the user; rotation replaces it.
pub async fn refresh_token(
    http_req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse> {
    let incoming = http_req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .ok_or_else(|| AppError::Authentication("Unauthorized request".into()))?;

    let claims = jwt::validate_refresh_token(&incoming)
        .map_err(|_| AppError::Authentication("Invalid refresh token".into()))?;
    let user_id = jwt::user_id_from_claims(&claims)?;

    let user = user_repo::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid refresh token".into()))?;

    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        return Err(AppError::Authentication(
            "Refresh token is expired or used".into(),
        ));
    }

    let pair = jwt::generate_token_pair(user.id, &user.email, &user.username)?;
    user_repo::set_refresh_token(pool.get_ref(), user.id, Some(&pair.refresh_token)).await?;

    let (access_cookie, refresh_cookie) = token_cookies(&pair, &config);

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(response::ApiResponse::success(
            200,
            json!({
                "accessToken": pair.access_token,
                "refreshToken": pair.refresh_token,
            }),
            "Access token refreshed",
        )))
}

/// POST /api/v1/users/logout
pub async fn logout(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    user_repo::set_refresh_token(pool.get_ref(), user.0, None).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE))
        .json(response::ApiResponse::success(
            200,
            json!({}),
            "User logged out successfully",
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_cookie_is_http_only() {
        let cookie = auth_cookie(ACCESS_TOKEN_COOKIE, "tok", 3600, true);
        assert_eq!(cookie.name(), "accessToken");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
