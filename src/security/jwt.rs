/// JWT token generation and validation using HS256.
/// Access and refresh tokens are signed with independent secrets and
/// independent lifetimes so a leaked access secret cannot mint refreshes.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Email address (access tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Username (access tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

static JWT_KEYS: OnceLock<JwtKeys> = OnceLock::new();

/// Load the signing keys from config. Must run during startup before any
/// token operation; calling twice is a no-op.
pub fn initialize_keys(config: &JwtConfig) {
    let _ = JWT_KEYS.set(JwtKeys {
        access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
        access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
        refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
        refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        access_ttl: config.access_token_ttl,
        refresh_ttl: config.refresh_token_ttl,
    });
}

fn keys() -> Result<&'static JwtKeys> {
    JWT_KEYS.get().ok_or_else(|| {
        AppError::Internal("JWT keys not initialized. Call initialize_keys() during startup".into())
    })
}

/// Generate a new access token carrying the user's identity claims
pub fn generate_access_token(user_id: Uuid, email: &str, username: &str) -> Result<String> {
    let keys = keys()?;
    let now = Utc::now();
    let expiry = now + Duration::seconds(keys.access_ttl);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "access".to_string(),
        email: Some(email.to_string()),
        username: Some(username.to_string()),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &keys.access_encoding,
    )?)
}

/// Generate a new refresh token (identity is just the user ID)
pub fn generate_refresh_token(user_id: Uuid) -> Result<String> {
    let keys = keys()?;
    let now = Utc::now();
    let expiry = now + Duration::seconds(keys.refresh_ttl);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "refresh".to_string(),
        email: None,
        username: None,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &keys.refresh_encoding,
    )?)
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(user_id: Uuid, email: &str, username: &str) -> Result<TokenPair> {
    Ok(TokenPair {
        access_token: generate_access_token(user_id, email, username)?,
        refresh_token: generate_refresh_token(user_id)?,
    })
}

fn validate(token: &str, key: &DecodingKey, expected_type: &str) -> Result<Claims> {
    let data = decode::<Claims>(token, key, &Validation::new(Algorithm::HS256))?;
    if data.claims.token_type != expected_type {
        return Err(AppError::Authentication("Invalid token".into()));
    }
    Ok(data.claims)
}

/// Validate an access token and return its claims
pub fn validate_access_token(token: &str) -> Result<Claims> {
    validate(token, &keys()?.access_decoding, "access")
}

/// Validate a refresh token and return its claims
pub fn validate_refresh_token(token: &str) -> Result<Claims> {
    validate(token, &keys()?.refresh_decoding, "refresh")
}

/// Extract the user ID from validated claims
pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Authentication("Invalid token subject".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        initialize_keys(&JwtConfig {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            access_token_ttl: 86400,
            refresh_token_ttl: 864000,
            cookie_secure: false,
        });
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        init();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com", "testuser").unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
        assert_eq!(claims.username.as_deref(), Some("testuser"));
        assert_eq!(user_id_from_claims(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_omits_identity_claims() {
        init();
        let user_id = Uuid::new_v4();
        let token = generate_refresh_token(user_id).unwrap();

        let claims = validate_refresh_token(&token).unwrap();
        assert_eq!(claims.token_type, "refresh");
        assert!(claims.email.is_none());
        assert!(claims.username.is_none());
    }

    #[test]
    fn test_tokens_not_interchangeable() {
        init();
        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(user_id, "test@example.com", "testuser").unwrap();

        // Different secrets, different claims; neither validates as the other.
        assert!(validate_refresh_token(&pair.access_token).is_err());
        assert!(validate_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_validate_garbage_token() {
        init();
        assert!(validate_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_refresh_expires_after_access() {
        init();
        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(user_id, "test@example.com", "testuser").unwrap();

        let access = validate_access_token(&pair.access_token).unwrap();
        let refresh = validate_refresh_token(&pair.refresh_token).unwrap();
        assert!(refresh.exp > access.exp);
    }
}
