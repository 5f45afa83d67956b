//! Pagination and sorting parameters
//!
//! Shared query-string handling for list endpoints. Page numbers are
//! 1-based; the limit is clamped to keep unbounded scans off the table.

use serde::Deserialize;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: i64 = 10;
/// Hard cap on page size
pub const MAX_LIMIT: i64 = 100;

/// Pagination query parameters (`?page=2&limit=20`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
        }
    }
}

impl PageQuery {
    /// Resolved page number (>= 1)
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Resolved page size, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Row offset for the resolved page
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Resolve a sort column against an allow-list.
///
/// Sort columns are interpolated into SQL, so anything not on the
/// allow-list falls back to the first (default) entry.
pub fn resolve_sort_column<'a>(requested: Option<&str>, allowed: &[&'a str]) -> &'a str {
    match requested {
        Some(col) => allowed
            .iter()
            .find(|a| a.eq_ignore_ascii_case(col))
            .copied()
            .unwrap_or(allowed[0]),
        None => allowed[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_LIMIT);

        let q = PageQuery {
            page: Some(-3),
            limit: Some(0),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn test_offset() {
        let q = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn test_resolve_sort_column() {
        let allowed = ["created_at", "title", "price"];
        assert_eq!(resolve_sort_column(Some("title"), &allowed), "title");
        assert_eq!(resolve_sort_column(Some("TITLE"), &allowed), "title");
        assert_eq!(
            resolve_sort_column(Some("password_hash"), &allowed),
            "created_at"
        );
        assert_eq!(resolve_sort_column(None, &allowed), "created_at");
    }
}
