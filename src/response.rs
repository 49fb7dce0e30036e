//! Uniform response envelope. Every endpoint, success or failure, answers
//! with `{ statusCode, data, message, success }`.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub data: Value,
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ApiResponse {
    pub fn success<T: Serialize>(status_code: u16, data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            status_code,
            data: serde_json::to_value(data).unwrap_or(Value::Null),
            message: message.into(),
            success: status_code < 400,
            errors: None,
        }
    }

    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        ApiResponse {
            status_code,
            data: Value::Null,
            message: message.into(),
            success: false,
            errors: Some(Vec::new()),
        }
    }
}

/// Paginated list wrapper used by every list endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_docs + limit - 1) / limit
        } else {
            0
        };
        Page {
            docs,
            total_docs,
            page,
            limit,
            total_pages,
        }
    }
}

/// 200 envelope
pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(200, data, message))
}

/// 201 envelope
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::success(201, data, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(
            200,
            json!({"id": 1}),
            "Video fetched successfully",
        ))
        .unwrap();
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["message"], "Video fetched successfully");
    }

    #[test]
    fn failure_envelope_has_null_data_and_errors_array() {
        let body = serde_json::to_value(ApiResponse::failure(404, "Video not found")).unwrap();
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert!(body["errors"].is_array());
    }

    #[test]
    fn success_flag_tracks_status_code() {
        assert!(ApiResponse::success(201, Value::Null, "created").success);
        assert!(!ApiResponse::success(500, Value::Null, "boom").success);
    }

    #[test]
    fn page_rounds_total_pages_up() {
        let page = Page::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_pages, 3);

        let exact = Page::new(vec![1], 20, 2, 10);
        assert_eq!(exact.total_pages, 2);

        let empty: Page<i32> = Page::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }
}
