//! Instance handle allocation.
//!
//! Handles are handed out round-robin from a bounded range: the counter
//! advances on every probe and wraps back to the range minimum after the
//! maximum, skipping handles that are still in use. A freed handle is
//! therefore reused only after the counter has gone all the way round.

use cell_common::consts::{CELL_HANDLE_MAX, CELL_HANDLE_MIN};
use cell_common::error::{CellError, CellResult};
use serde::Serialize;
use std::fmt;

/// Numeric identity of a cellular instance, as returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CellHandle(i32);

impl CellHandle {
    /// Wrap a raw handle value, e.g. one received from a caller.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CellHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive range of handles an allocator may hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRange {
    min: i32,
    max: i32,
}

impl HandleRange {
    /// Create a range inside the cellular handle family.
    ///
    /// # Errors
    /// `InvalidParameter` if `min > max` or either bound lies outside
    /// `[CELL_HANDLE_MIN, CELL_HANDLE_MAX]`.
    pub fn new(min: i32, max: i32) -> CellResult<Self> {
        if min > max {
            return Err(CellError::InvalidParameter(format!(
                "invalid handle range [{min}, {max}]"
            )));
        }
        if min < CELL_HANDLE_MIN || max > CELL_HANDLE_MAX {
            return Err(CellError::InvalidParameter(format!(
                "handle range [{min}, {max}] outside cellular range \
                 [{CELL_HANDLE_MIN}, {CELL_HANDLE_MAX}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// The cellular network handle range.
    pub const fn cellular() -> Self {
        Self {
            min: CELL_HANDLE_MIN,
            max: CELL_HANDLE_MAX,
        }
    }

    /// Lowest handle.
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Highest handle.
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Number of handles in the range.
    pub fn len(&self) -> u64 {
        (i64::from(self.max) - i64::from(self.min) + 1) as u64
    }

    /// Always false: a range holds at least one handle.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether a handle lies inside the range.
    pub fn contains(&self, handle: CellHandle) -> bool {
        (self.min..=self.max).contains(&handle.get())
    }
}

impl Default for HandleRange {
    fn default() -> Self {
        Self::cellular()
    }
}

/// Round-robin handle allocator.
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    range: HandleRange,
    next: i32,
}

impl HandleAllocator {
    /// Create an allocator that starts at the range minimum.
    pub fn new(range: HandleRange) -> Self {
        Self {
            range,
            next: range.min(),
        }
    }

    /// Range this allocator hands out from.
    pub fn range(&self) -> HandleRange {
        self.range
    }

    /// Next candidate that will be probed.
    pub fn peek(&self) -> CellHandle {
        CellHandle(self.next)
    }

    /// Allocate a handle for which `in_use` returns false.
    ///
    /// Every probe advances the counter, so consecutive allocations never
    /// return the same candidate twice in a row. At most one full lap of
    /// the range is probed.
    ///
    /// # Errors
    /// `NoMemory` if every handle in the range is in use.
    pub fn allocate(
        &mut self,
        mut in_use: impl FnMut(CellHandle) -> bool,
    ) -> CellResult<CellHandle> {
        for _ in 0..self.range.len() {
            let candidate = CellHandle(self.next);
            self.advance();
            if !in_use(candidate) {
                return Ok(candidate);
            }
        }
        Err(CellError::NoMemory)
    }

    fn advance(&mut self) {
        self.next = if self.next >= self.range.max() {
            self.range.min()
        } else {
            self.next + 1
        };
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new(HandleRange::default())
    }
}
