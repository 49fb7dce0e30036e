pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

use serde::Deserialize;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// `?page=&limit=` query, 1-indexed with clamped bounds
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// (page, limit, offset) with defaults applied
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let (page, limit, offset) = PageQuery::default().resolve();
        assert_eq!((page, limit, offset), (1, 10, 0));
    }

    #[test]
    fn page_query_offset_math() {
        let q = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(q.resolve(), (3, 20, 40));
    }

    #[test]
    fn page_query_clamps_bad_input() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(10_000),
        };
        let (page, limit, offset) = q.resolve();
        assert_eq!((page, limit, offset), (1, MAX_LIMIT, 0));

        let q = PageQuery {
            page: Some(-5),
            limit: Some(0),
        };
        assert_eq!(q.resolve(), (1, 1, 0));
    }
}
