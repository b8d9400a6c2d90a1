/// Pagination, sorting and search helpers shared by the list operations
///
/// Both store backends use these types so that page boundaries, totals and
/// search semantics are identical regardless of where the rows live.
///
/// # Invariants
///
/// - `page >= 1`
/// - `1 <= limit <= 100`
/// - Totals are computed over the filtered set, never the full table
///
/// # Example
///
/// ```
/// use teamboard_shared::pagination::{PageMeta, PageRequest};
///
/// let request = PageRequest::new(2, 10).unwrap();
/// assert_eq!(request.offset(), 10);
///
/// let meta = PageMeta::new(request, 25);
/// assert_eq!(meta.total_pages, 3);
/// ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Error type for invalid page requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("Page must be at least 1")]
    InvalidPage,

    #[error("Limit must be between 1 and {MAX_PAGE_SIZE}")]
    InvalidLimit,
}

impl PaginationError {
    /// Name of the offending query parameter
    pub fn field(&self) -> &'static str {
        match self {
            PaginationError::InvalidPage => "page",
            PaginationError::InvalidLimit => "limit",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Applies the direction to an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a page request, enforcing the pagination invariants
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if limit < 1 || limit > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidLimit);
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata returned with every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
}

impl PageMeta {
    /// Computes metadata for a request over `total_items` matching rows
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.limit));

        Self {
            current_page: request.page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_items,
            page_size: request.limit,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total_items),
        }
    }

    /// Slices an already filtered and sorted set down to the requested page
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .collect();

        Self::new(items, request, total)
    }
}

/// Trims a search term, treating blank input as no search
pub fn normalize_search(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Case-insensitive substring match
pub fn matches_search(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Builds an `ILIKE` pattern matching `term` anywhere, with wildcards escaped
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
