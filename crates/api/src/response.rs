//! Shared response envelope types.
//!
//! Every success response is `{ "data": ..., "meta": ... }`; `meta` carries
//! pagination continuation for list endpoints and a quiet
//! `{next_cursor: null, has_more: false}` for everything else.

use serde::Serialize;
use tastekid_core::pagination::Page;

/// Pagination continuation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl PageMeta {
    /// Metadata for non-list responses.
    pub fn none() -> Self {
        Self {
            next_cursor: None,
            has_more: false,
        }
    }
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            next_cursor: page.next_cursor.clone(),
            has_more: page.has_more,
        }
    }
}

/// Standard `{ "data": T, "meta": ... }` success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub meta: PageMeta,
}

impl<T: Serialize> DataResponse<T> {
    /// Envelope a single (non-paginated) payload.
    pub fn single(data: T) -> Self {
        Self {
            data,
            meta: PageMeta::none(),
        }
    }

    /// Envelope a page payload with its continuation metadata.
    pub fn page(data: T, meta: PageMeta) -> Self {
        Self { data, meta }
    }
}
