//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a registrant (one mounted video view).
///
/// Opaque outside this crate's allocator: two ids are the same registrant
/// iff they compare equal. An id is allocated once when the view registers
/// and stays stable until it unregisters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Create a view id from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Hands out process-unique [`ViewId`]s.
///
/// One allocator lives in each provider; ids are never reused for the
/// lifetime of the allocator.
#[derive(Debug, Default)]
pub struct ViewIdAllocator {
    next: AtomicU64,
}

impl ViewIdAllocator {
    /// Create an allocator whose first id is `view-0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn allocate(&self) -> ViewId {
        ViewId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
