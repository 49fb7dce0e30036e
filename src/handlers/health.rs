use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::error::Result;
use crate::response;

/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    sqlx::query("SELECT 1").execute(pool.get_ref()).await?;

    Ok(response::ok(
        json!({ "status": "ok" }),
        "Service is healthy",
    ))
}
