use crate::{Error, MemoryRegion, ProcessRecord, ProcessSnapshot};
use std::path::PathBuf;

/// Read-only access to the operating system's view of running processes.
///
/// Every call is a blocking, live query. Nothing is cached between calls, so
/// two calls about the same pid may observe different processes.
pub trait Introspector {
    /// Capture the whole process table.
    ///
    /// Fails only if the table cannot be opened at all.
    fn list_all(&self) -> Result<ProcessSnapshot, Error>;

    /// Capture a single process. Returns [`Error::NotFound`] if it does not
    /// exist.
    fn lookup(&self, pid: u32) -> Result<ProcessRecord, Error>;

    /// Current executable of `pid`.
    ///
    /// `Ok(None)` means there is no path to report: the image was unlinked
    /// or the process is gone. Callers tell the two apart with
    /// [`is_alive`](Self::is_alive).
    fn executable(&self, pid: u32) -> Result<Option<PathBuf>, Error>;

    /// Zero-effect existence check.
    fn is_alive(&self, pid: u32) -> bool;

    /// Argument vector joined by spaces, bounded to
    /// [`EVIDENCE_MAX`](crate::utils::EVIDENCE_MAX) bytes.
    fn arguments(&self, pid: u32) -> Result<String, Error>;

    /// Mapped regions in address order.
    fn memory_regions(&self, pid: u32) -> Result<Vec<MemoryRegion>, Error>;

    fn user_id(&self, name: &str) -> Result<Option<u32>, Error>;

    fn user_name(&self, uid: u32) -> Option<String>;
}
