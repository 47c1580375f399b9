//! Sequential id allocation with a per-directory high-water mark.
//!
//! The mark is advisory: `allocate` always recomputes the on-disk maximum
//! first, so externally created files push the counter forward instead of
//! causing collisions. There is deliberately no lock between the recompute
//! and the eventual file write; two near-simultaneous creates can still
//! claim the same id, and validate/fix repairs that afterwards.
use super::error::StoreError;
use super::scan;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-directory next-id counters, owned by the store instance.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: HashMap<PathBuf, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the high-water mark from a scan that already happened.
    pub fn observe(&mut self, dir: &Path, max_id: u64) {
        self.next.insert(dir.to_path_buf(), max_id.saturating_add(1));
    }

    /// Claim the next free id for `dir`.
    pub fn allocate(&mut self, dir: &Path) -> Result<u64, StoreError> {
        let current_max = scan::max_id(dir)?;
        let next = self.next.entry(dir.to_path_buf()).or_insert(1);
        if *next <= current_max {
            tracing::debug!(
                dir = %dir.display(),
                stale = *next,
                current_max,
                "allocator behind disk, resetting"
            );
            *next = current_max.saturating_add(1);
        }
        let id = *next;
        *next = next.saturating_add(1);
        Ok(id)
    }
}

#[cfg(test)]
#[path = "alloc_tests.rs"]
mod tests;
