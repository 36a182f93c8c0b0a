use thiserror::Error;

/// Page requested when the `page` query parameter is missing
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the `size` query parameter is missing
pub const DEFAULT_SIZE: u64 = 10;

/// Largest offset or limit a SQL backend accepts, they bind as `BIGINT`
pub const MAX_BOUND: u64 = i64::MAX as u64;

/// A page request whose rows cannot be addressed with a `BIGINT` offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageBoundsError {
    #[error("Page size must not exceed {MAX_BOUND}")]
    Size,
    #[error("Page is too far, its offset exceeds {MAX_BOUND}")]
    Page,
}

impl PageBoundsError {
    /// Query parameter at fault
    pub fn field(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Page => "page",
        }
    }
}

/// Offset based paging bounds of a list request.
///
/// Large sizes are not clamped, but [`PageRequest::check`] rejects requests
/// past [`MAX_BOUND`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            size: size.unwrap_or(DEFAULT_SIZE),
        }
    }

    /// Rejects a size or an offset that does not fit in a `BIGINT`
    pub fn check(&self) -> Result<(), PageBoundsError> {
        if self.size > MAX_BOUND {
            return Err(PageBoundsError::Size);
        }
        match self.page.saturating_sub(1).checked_mul(self.size) {
            Some(offset) if offset <= MAX_BOUND => Ok(()),
            _ => Err(PageBoundsError::Page),
        }
    }

    /// Number of rows skipped, page 0 behaves like page 1
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.size)
            .min(MAX_BOUND)
    }

    pub fn limit(&self) -> u64 {
        self.size.min(MAX_BOUND)
    }

    /// `ceil(count / size)`, zero when the page size is zero
    pub fn total_pages(&self, count: u64) -> u64 {
        if self.size == 0 {
            0
        } else {
            count.div_ceil(self.size)
        }
    }

    /// Number of rows this page holds out of `count` matching rows
    pub fn rows_on_page(&self, count: u64) -> u64 {
        count.saturating_sub(self.offset()).min(self.size)
    }
}
