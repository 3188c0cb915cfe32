//! Pagination state for GitHub listing responses.

/// Current page state for paginated results.
///
/// # Example
///
/// ```
/// use labelwright::github::PageInfo;
///
/// let info = PageInfo::new(2).with_has_next(true);
/// assert_eq!(info.next_page(), 3);
/// assert!(info.has_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-based).
    current_page: u32,
    /// Whether more pages exist after the current one.
    has_next: bool,
}

impl PageInfo {
    /// Creates a page info with no further pages.
    #[must_use]
    pub const fn new(current_page: u32) -> Self {
        Self {
            current_page,
            has_next: false,
        }
    }

    /// Sets whether there is a next page.
    #[must_use]
    pub const fn with_has_next(mut self, has_next: bool) -> Self {
        self.has_next = has_next;
        self
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns true if more pages exist after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Page number that follows this one.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.current_page.saturating_add(1)
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(1)
    }
}
