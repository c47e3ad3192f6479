//! Paginated list envelope.

use serde::{Deserialize, Serialize};

/// Page metadata attached to paginated list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// One-based index of this page.
    pub current_page: u64,
    /// Page size used for this response.
    pub limit: u64,
    /// Whether a following page exists.
    pub next_page: bool,
}

impl PageMetadata {
    /// Whether a following page exists.
    pub const fn has_next(&self) -> bool {
        self.next_page
    }

    /// Whether the listing spans more than one page.
    pub const fn is_multi_page(&self) -> bool {
        self.total_pages > 1
    }

    /// Page number to request next, if any.
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.next_page {
            Some(self.current_page.saturating_add(1))
        } else {
            None
        }
    }
}

/// Envelope family `{ payload: [..], metadata }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedEnvelope<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub payload: Vec<T>,
    /// Position of this page within the listing.
    pub metadata: PageMetadata,
}

impl<T> PagedEnvelope<T> {
    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
