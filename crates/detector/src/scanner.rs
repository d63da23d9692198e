#![forbid(unsafe_code)]

use procstat::{Introspector, MemoryRegion};
use tracing::trace;

/// Looks for executable code mapped from files that no longer exist.
#[derive(Clone, Copy)]
pub struct MemoryMapScanner<'a> {
    facility: &'a dyn Introspector,
}

impl<'a> MemoryMapScanner<'a> {
    pub fn new(facility: &'a dyn Introspector) -> Self {
        Self { facility }
    }

    /// First unlinked executable region of `pid`, in address order.
    ///
    /// A memory map that cannot be read counts as no match.
    pub fn scan(&self, pid: u32) -> Option<MemoryRegion> {
        let regions = match self.facility.memory_regions(pid) {
            Ok(regions) => regions,
            Err(err) => {
                trace!(pid, %err, "Memory map unavailable");
                return None;
            }
        };
        regions.into_iter().find(MemoryRegion::is_unlinked_code)
    }
}
