use std::collections::HashMap;

use crate::{
    store::{BrowseCriteria, decode_cursor},
    validation::value::leading_int,
};

pub const DEFAULT_LIMIT: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything but `asc` (any case) sorts descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Page size from `limit`. Zero, negative and unreadable values fall back to
/// [`DEFAULT_LIMIT`].
pub fn page_size(raw: Option<&str>) -> u64 {
    match raw.map(leading_int) {
        Some(limit) if limit > 0 => limit as u64,
        _ => DEFAULT_LIMIT,
    }
}

/// One-based page number from `page`, never below 1.
pub fn page_number(raw: Option<&str>) -> u64 {
    match raw.map(leading_int) {
        Some(page) if page > 0 => page as u64,
        _ => 1,
    }
}

/// Listing parameters for products: newest first, keyset continuation only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBrowseQuery {
    pub limit: u64,
    pub cursor: Option<i64>,
}

impl ProductBrowseQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            limit: page_size(params.get("limit").map(String::as_str)),
            cursor: params.get("cursor").and_then(|c| decode_cursor(c)),
        }
    }

    pub fn criteria(&self) -> BrowseCriteria {
        BrowseCriteria {
            sort: "id".to_string(),
            direction: SortOrder::Desc,
            limit: self.limit,
            offset: 0,
            cursor: self.cursor,
            filters: HashMap::new(),
        }
    }
}

/// Listing parameters for categories. The whole query map doubles as the
/// attribute filter set.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBrowseQuery {
    pub sort: String,
    pub direction: SortOrder,
    pub limit: u64,
    pub page: u64,
    pub cursor: Option<i64>,
    pub filters: HashMap<String, String>,
}

impl CategoryBrowseQuery {
    pub fn from_params(params: HashMap<String, String>) -> Self {
        let sort = params
            .get("sort")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or("id")
            .to_string();
        let direction = SortOrder::parse(params.get("direction").map(String::as_str));
        let limit = page_size(params.get("limit").map(String::as_str));
        let page = page_number(params.get("page").map(String::as_str));
        let cursor = params.get("cursor").and_then(|c| decode_cursor(c));
        Self {
            sort,
            direction,
            limit,
            page,
            cursor,
            filters: params,
        }
    }

    /// Rows skipped before this page, capped at what an SQL `OFFSET` accepts.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(i64::MAX as u64)
    }

    pub fn criteria(&self) -> BrowseCriteria {
        BrowseCriteria {
            sort: self.sort.clone(),
            direction: self.direction,
            limit: self.limit,
            offset: self.offset(),
            cursor: self.cursor,
            filters: self.filters.clone(),
        }
    }
}
