//! Fixed-size page windows over an ordered, counted collection.

use thiserror::Error;

/// Rows returned per list call.
pub const PAGE_SIZE: u64 = 10;

/// Requested page does not intersect the collection. How this maps to an
/// HTTP status depends on the entity (see `model::ListOverflow`).
#[derive(Error, Debug, PartialEq, Eq)]
#[error("page out of range")]
pub struct PageOutOfRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

/// Compute the half-open window `[offset, offset + PAGE_SIZE)` for a 1-based
/// page. Pages below 1 are rejected, as is any window starting at or past
/// `total` while the collection is non-empty. An empty collection accepts
/// every page and yields an empty slice.
pub fn window(page: i64, total: u64) -> Result<PageWindow, PageOutOfRange> {
    if page < 1 {
        return Err(PageOutOfRange);
    }
    let offset = (page as u64 - 1) * PAGE_SIZE;
    if total > 0 && offset >= total {
        return Err(PageOutOfRange);
    }
    Ok(PageWindow {
        limit: PAGE_SIZE,
        offset,
    })
}
