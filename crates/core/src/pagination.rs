//! Cursor pagination helpers.
//!
//! Cursors are string-encoded non-negative offsets ("0", "20", ...).
//! Every list endpoint fetches `k + 1` rows; the extra row only signals
//! `has_more` and is dropped from the page.

use crate::error::CoreError;

/// Default page size when `k` is omitted.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validate a requested page size. Out-of-range values are an error, not
/// a clamp, so clients learn about their mistake.
pub fn validate_page_size(k: Option<i64>) -> Result<i64, CoreError> {
    let k = k.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&k) {
        return Err(CoreError::InvalidArgument(format!(
            "k must be between 1 and {MAX_PAGE_SIZE}, got {k}"
        )));
    }
    Ok(k)
}

/// Decode a cursor into an offset. Missing cursors mean offset 0.
pub fn decode_cursor(cursor: Option<&str>) -> Result<i64, CoreError> {
    match cursor {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!("cursor must be a non-negative integer, got {raw:?}"))
            }),
    }
}

/// A page of items plus its continuation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Assemble a page from a `k + 1` over-fetch.
    pub fn from_overfetch(mut items: Vec<T>, k: i64, offset: i64) -> Self {
        let has_more = items.len() as i64 > k;
        if has_more {
            items.truncate(k as usize);
        }
        Self {
            items,
            next_cursor: has_more.then(|| (offset + k).to_string()),
            has_more,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_page_size --------------------------------------------------

    #[test]
    fn page_size_defaults_when_omitted() {
        assert_eq!(validate_page_size(None).unwrap(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_size_accepts_bounds() {
        assert_eq!(validate_page_size(Some(1)).unwrap(), 1);
        assert_eq!(validate_page_size(Some(100)).unwrap(), 100);
    }

    #[test]
    fn page_size_rejects_out_of_range() {
        assert!(validate_page_size(Some(0)).is_err());
        assert!(validate_page_size(Some(-3)).is_err());
        assert!(validate_page_size(Some(101)).is_err());
    }

    // -- decode_cursor -------------------------------------------------------

    #[test]
    fn cursor_defaults_to_zero() {
        assert_eq!(decode_cursor(None).unwrap(), 0);
        assert_eq!(decode_cursor(Some("")).unwrap(), 0);
    }

    #[test]
    fn cursor_parses_offsets() {
        assert_eq!(decode_cursor(Some("0")).unwrap(), 0);
        assert_eq!(decode_cursor(Some("40")).unwrap(), 40);
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!(decode_cursor(Some("-1")).is_err());
        assert!(decode_cursor(Some("abc")).is_err());
        assert!(decode_cursor(Some("1.5")).is_err());
    }

    // -- Page::from_overfetch ------------------------------------------------

    #[test]
    fn overfetch_trims_and_flags_more() {
        let page = Page::from_overfetch(vec![1, 2, 3, 4], 3, 0);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("3"));
    }

    #[test]
    fn short_page_has_no_continuation() {
        let page = Page::from_overfetch(vec![1, 2], 3, 0);
        assert_eq!(page.items, vec![1, 2]);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn exact_page_has_no_continuation() {
        let page = Page::from_overfetch(vec![1, 2, 3], 3, 6);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn next_cursor_advances_from_offset() {
        let page = Page::from_overfetch(vec![1, 2, 3, 4], 3, 9);
        assert_eq!(page.next_cursor.as_deref(), Some("12"));
    }
}
