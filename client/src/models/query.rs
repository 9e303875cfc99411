//! Pagination and time-window query parameters.

use crate::operation::Operation;
use chrono::{DateTime, Utc};

/// Page selection for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    /// Page size; server default when `None`
    pub per_page: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: None,
        }
    }
}

impl Pagination {
    /// Select `page` with `per_page` items.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: Some(per_page),
        }
    }

    pub(crate) fn apply(self, op: Operation) -> Operation {
        op.with_query("page", self.page)
            .with_optional_query("per_page", self.per_page)
    }
}

/// Optional time bounds for statistics endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    /// Lower bound
    pub from: Option<DateTime<Utc>>,
    /// Upper bound
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Window between two instants.
    #[must_use]
    pub const fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub(crate) fn apply(self, op: Operation) -> Operation {
        op.with_optional_query("from", self.from.map(|t| t.timestamp()))
            .with_optional_query("to", self.to.map(|t| t.timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_query() {
        let op = Pagination::new(3, 25).apply(Operation::get("/stats/issued"));
        assert_eq!(
            op.query(),
            &[
                ("page".to_string(), "3".to_string()),
                ("per_page".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_pagination_omits_per_page() {
        let op = Pagination::default().apply(Operation::get("/claims/domains"));
        assert_eq!(op.query(), &[("page".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_time_window_query() {
        let from = DateTime::from_timestamp(100, 0).unwrap();
        let op = TimeWindow {
            from: Some(from),
            to: None,
        }
        .apply(Operation::get("/stats/expiring"));
        assert_eq!(op.query(), &[("from".to_string(), "100".to_string())]);
    }
}
