//! Best-effort pagination for raw SQL text.
//!
//! Appends row-limiting clauses to a query string without parsing it. A
//! query that already mentions `limit` or `offset` anywhere (in any case, even
//! inside an identifier or literal) is left alone.

use serde::{Deserialize, Serialize};

/// Requested page window. Non-positive values mean "not requested".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<i64>,

    /// Number of rows to skip.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl Pagination {
    /// Creates a page window.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Returns true if the caller passed either value.
    pub fn is_requested(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// The limit to apply, if positive.
    pub fn effective_limit(&self) -> Option<i64> {
        self.limit.filter(|&n| n > 0)
    }

    /// The offset to apply, if positive. Zero is the default start.
    pub fn effective_offset(&self) -> Option<i64> {
        self.offset.filter(|&n| n > 0)
    }
}

/// How a dialect spells its row-limiting clauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m` (PostgreSQL, MySQL, SQLite).
    #[default]
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (Oracle).
    OffsetFetch,
}

/// Trims whitespace and a single trailing `;`.
pub fn strip_terminator(query: &str) -> &str {
    let trimmed = query.trim();
    trimmed.strip_suffix(';').unwrap_or(trimmed).trim()
}

/// Returns true if the text already contains `limit` or `offset`.
pub fn has_pagination(query: &str) -> bool {
    let lower = query.to_lowercase();
    lower.contains("limit") || lower.contains("offset")
}

/// Rewrites `query` to apply `page`.
///
/// The query is always normalized with [`strip_terminator`]; clauses are
/// appended only when the text has no existing `limit`/`offset`.
pub fn paginate(query: &str, page: &Pagination, style: PaginationStyle) -> String {
    let query = strip_terminator(query);

    if has_pagination(query) {
        return query.to_string();
    }

    let limit = page.effective_limit();
    let offset = page.effective_offset();
    let mut paginated = query.to_string();

    match style {
        PaginationStyle::LimitOffset => {
            if let Some(limit) = limit {
                paginated.push_str(&format!(" LIMIT {limit}"));
            }
            if let Some(offset) = offset {
                paginated.push_str(&format!(" OFFSET {offset}"));
            }
        }
        PaginationStyle::OffsetFetch => {
            if let Some(offset) = offset {
                paginated.push_str(&format!(" OFFSET {offset} ROWS"));
            }
            if let Some(limit) = limit {
                paginated.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
            }
        }
    }

    paginated
}
