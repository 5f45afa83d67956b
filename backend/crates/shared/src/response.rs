//! API response envelope
//!
//! Every endpoint answers with the same envelope:
//! `{ "success": true, "data": ... }` on success, with an optional
//! `pagination` block on list endpoints, and
//! `{ "success": false, "error": { code, message } }` on failure
//! (the error side is rendered by `AppError`'s `IntoResponse`).

use serde::Serialize;

/// Pagination metadata returned alongside list data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

#[cfg(feature = "axum")]
mod axum_impls {
    use super::*;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    /// 200 with the success envelope
    pub fn ok<T: Serialize>(data: T) -> Response {
        (StatusCode::OK, Json(Envelope::new(data))).into_response()
    }

    /// 201 with the success envelope
    pub fn created<T: Serialize>(data: T) -> Response {
        (StatusCode::CREATED, Json(Envelope::new(data))).into_response()
    }

    /// 200 with data plus a pagination block
    pub fn paginated<T: Serialize>(data: Vec<T>, total: i64, page: i64, limit: i64) -> Response {
        let envelope = Envelope::paginated(data, Pagination::new(total, page, limit));
        (StatusCode::OK, Json(envelope)).into_response()
    }
}

#[cfg(feature = "axum")]
pub use axum_impls::{created, ok, paginated};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(45, 2, 10);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(45, 5, 10);
        assert!(!p.has_next);

        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);

        // exact multiple does not add a phantom page
        let p = Pagination::new(30, 1, 10);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = Envelope::new(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let envelope = Envelope::paginated(vec![1, 2, 3], Pagination::new(3, 1, 10));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["pagination"]["hasNext"], false);
    }
}
