//! Offset cursors and the page slicing every listing goes through.
//!
//! A cursor is the decimal offset of the first element the caller has not
//! seen yet; the empty string means offset zero. Cursors are only meaningful
//! for the query and parameters that produced them.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, str::FromStr};

use super::error::ServiceError;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor(usize);

impl Cursor {
    pub fn at(offset: usize) -> Self {
        Self(offset)
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

impl FromStr for Cursor {
    type Err = ServiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Ok(Self(0));
        }
        raw.parse::<usize>()
            .map(Self)
            .map_err(|_| ServiceError::InvalidCursor(raw.to_string()))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a page starts and how many elements it may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Cursor,
    pub size: usize,
}

impl PageRequest {
    pub fn new(cursor: Cursor, size: usize) -> Self {
        // A zero-sized page would hand back its own cursor forever.
        Self {
            cursor,
            size: size.max(1),
        }
    }

    pub fn first(size: usize) -> Self {
        Self::new(Cursor::default(), size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of a listing.
///
/// `has_next == false` exactly when `cursor` is empty; otherwise `cursor`
/// is the offset of the first element not in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingResult<T> {
    pub data: Vec<T>,
    pub has_next: bool,
    pub cursor: String,
}

impl<T> PagingResult<T> {
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// A page with nothing after it. Search results always take this shape.
    pub fn last(data: Vec<T>) -> Self {
        Self {
            data,
            has_next: false,
            cursor: String::new(),
        }
    }

    pub fn with_next(data: Vec<T>, next: Option<Cursor>) -> Self {
        match next {
            Some(next) => Self {
                data,
                has_next: true,
                cursor: next.to_string(),
            },
            None => Self::last(data),
        }
    }
}

/// Index range of the page starting at `start`, plus the offset the next
/// page would start at, for a sequence of `len` elements.
pub fn page_bounds(len: usize, start: usize, size: usize) -> (Range<usize>, Option<usize>) {
    if start >= len {
        return (0..0, None);
    }

    let end = start.saturating_add(size).min(len);
    let next = (end < len).then_some(end);
    (start..end, next)
}

/// Slice `items` from `start`, at most `size` elements long.
pub fn sublist<T>(items: &[T], start: usize, size: usize) -> (&[T], Option<usize>) {
    let (range, next) = page_bounds(items.len(), start, size);
    (&items[range], next)
}

/// Cut the page described by `page` out of `items`.
pub fn paginate<T: Clone>(items: &[T], page: PageRequest) -> PagingResult<T> {
    let (data, next) = sublist(items, page.cursor.offset(), page.size);
    PagingResult::with_next(data.to_vec(), next.map(Cursor::at))
}
