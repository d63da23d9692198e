#![forbid(unsafe_code)]

use procstat::Introspector;
use std::path::PathBuf;
use tracing::trace;

/// Result of asking for a process's executable.
#[derive(Debug)]
pub enum Resolution {
    /// The image is backed by a file that still exists.
    Resolved(PathBuf),
    /// The process is alive but its image has no path anymore.
    ///
    /// `evidence` is the argument vector, empty if it could not be read.
    Missing { evidence: String },
    /// The process exited after the snapshot was taken.
    Vanished,
    /// The executable could not be read for another reason.
    Unreadable(procstat::Error),
}

/// Resolves executables and separates deleted images from exited processes.
#[derive(Clone, Copy)]
pub struct ExecutableResolver<'a> {
    facility: &'a dyn Introspector,
}

impl<'a> ExecutableResolver<'a> {
    pub fn new(facility: &'a dyn Introspector) -> Self {
        Self { facility }
    }

    pub fn resolve(&self, pid: u32) -> Resolution {
        match self.facility.executable(pid) {
            Ok(Some(path)) => Resolution::Resolved(path),
            Ok(None) => {
                // Both an unlinked image and an exited process leave no path.
                // The process may still exit right after this probe.
                if !self.facility.is_alive(pid) {
                    return Resolution::Vanished;
                }
                let evidence = self.facility.arguments(pid).unwrap_or_else(|err| {
                    trace!(pid, %err, "Arguments unavailable");
                    String::new()
                });
                Resolution::Missing { evidence }
            }
            Err(err) => Resolution::Unreadable(err),
        }
    }
}
