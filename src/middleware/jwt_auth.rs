/// JWT guard middleware. Accepts the access token from the `accessToken`
/// cookie or an `Authorization: Bearer` header, validates it, confirms the
/// user still exists, and stores the user ID in request extensions.
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::AppError;
use crate::security::jwt;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// User ID of the authenticated caller
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// Pull the raw access token out of a request, cookie first
pub fn extract_access_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

fn user_id_from_token(token: &str) -> Result<Uuid, AppError> {
    let claims = jwt::validate_access_token(token)
        .map_err(|_| AppError::Authentication("Invalid access token".into()))?;
    jwt::user_id_from_claims(&claims)
}

/// JWT authentication middleware factory
pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Copy everything out of the request before touching
            // extensions_mut(); overlapping RefCell borrows panic.
            let auth = async {
                let token = extract_access_token(req.request())
                    .ok_or_else(|| AppError::Authentication("Unauthorized request".into()))?;

                let user_id = user_id_from_token(&token)?;

                // A valid token for a deleted user is still unauthorized.
                let pool = req
                    .app_data::<web::Data<PgPool>>()
                    .ok_or_else(|| AppError::Internal("Missing database pool".into()))?
                    .clone();
                let user = user_repo::find_by_id(&pool, user_id)
                    .await
                    .map_err(AppError::Database)?;
                if user.is_none() {
                    return Err(AppError::Authentication("Invalid access token".into()));
                }

                Ok(user_id)
            }
            .await;

            // Render rejections as responses here so the envelope is the
            // same inside test services as behind a real server.
            match auth {
                Ok(user_id) => {
                    req.extensions_mut().insert(UserId(user_id));
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Err(err) => Ok(req
                    .into_response(err.error_response())
                    .map_into_right_body()),
            }
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    /// Uses the identity resolved by `JwtAuth` when the route is wrapped;
    /// otherwise performs the same token-plus-user-row check itself, so
    /// guarded methods can share a path with public ones.
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user_id) = req.extensions().get::<UserId>().cloned() {
            return Box::pin(async move { Ok(user_id) });
        }

        let token = extract_access_token(req);
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let token = token.ok_or_else(|| {
                Error::from(AppError::Authentication("Unauthorized request".into()))
            })?;
            let user_id = user_id_from_token(&token)?;

            let pool = pool
                .ok_or_else(|| Error::from(AppError::Internal("Missing database pool".into())))?;
            let user = user_repo::find_by_id(&pool, user_id)
                .await
                .map_err(AppError::Database)?;
            if user.is_none() {
                return Err(AppError::Authentication("Invalid access token".into()).into());
            }

            Ok(UserId(user_id))
        })
    }
}

/// Lax identity for routes that work anonymously but personalize when a
/// valid token is present. An invalid token reads as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalUserId(pub Option<Uuid>);

impl FromRequest for OptionalUserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = extract_access_token(req).and_then(|t| user_id_from_token(&t).ok());
        ready(Ok(OptionalUserId(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn init_keys() {
        jwt::initialize_keys(&crate::config::JwtConfig {
            access_secret: "mw-access-secret".into(),
            refresh_secret: "mw-refresh-secret".into(),
            access_token_ttl: 3600,
            refresh_token_ttl: 86400,
            cookie_secure: false,
        });
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(extract_access_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_wins_over_header() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(ACCESS_TOKEN_COOKIE, "tok"))
            .insert_header(("Authorization", "Bearer other"))
            .to_http_request();
        assert_eq!(extract_access_token(&req).as_deref(), Some("tok"));
    }

    #[test]
    fn missing_token_yields_none() {
        let req = TestRequest::default().to_http_request();
        assert!(extract_access_token(&req).is_none());
    }

    #[actix_web::test]
    async fn optional_identity_ignores_garbage_tokens() {
        init_keys();
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_http_request();
        let id = OptionalUserId::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert!(id.0.is_none());
    }

    #[actix_web::test]
    async fn optional_identity_resolves_valid_token() {
        init_keys();
        let user_id = Uuid::new_v4();
        let token = jwt::generate_access_token(user_id, "a@b.c", "abc").unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        let id = OptionalUserId::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(id.0, Some(user_id));
    }
}
