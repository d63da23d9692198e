use procfs::ProcError;

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process table itself could not be opened.
    #[error("Failed to open the process table: {0}")]
    Unavailable(#[source] ProcError),

    /// The process does not exist (anymore).
    #[error("No such process: {0}")]
    NotFound(u32),

    /// The process exists but its details may not be read by this user.
    #[error("Permission denied for process {0}")]
    PermissionDenied(u32),

    /// Any other failure while reading a process from procfs.
    #[error("Failed to read procfs info for process {pid}: {source}")]
    ProcfsReadFailed {
        pid: u32,
        #[source]
        source: ProcError,
    },

    /// Error occurred while querying the user database.
    #[error("Failed to look up user: {0}")]
    UserLookupFailed(#[from] nix::Error),
}

impl Error {
    /// Attach `pid` to a procfs error, keeping absence and permission
    /// failures distinguishable for callers.
    pub(crate) fn from_proc(pid: u32, err: ProcError) -> Self {
        match err {
            ProcError::NotFound(_) => Self::NotFound(pid),
            ProcError::PermissionDenied(_) => Self::PermissionDenied(pid),
            source => Self::ProcfsReadFailed { pid, source },
        }
    }
}
