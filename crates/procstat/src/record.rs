/// A single entry of the process table, copied at capture time.
///
/// The live process may have exited, or its pid may have been reused, by the
/// time the record is examined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,

    /// Parent process id. `0` for processes started by the kernel itself.
    pub ppid: u32,

    /// Process group id.
    pub pgid: u32,

    /// Container the process lives in. `0` is the host.
    pub jid: u64,

    /// Owner of `/proc/<pid>`, which follows the effective user id.
    pub uid: u32,

    /// Short command name, possibly truncated by the kernel.
    pub comm: String,

    /// Kernel threads have no user space image to check.
    pub kernel_thread: bool,

    /// Exited but not yet reaped by its parent.
    pub zombie: bool,
}

impl ProcessRecord {
    /// Owned by the kernel rather than by user space.
    #[inline]
    pub fn is_kernel(&self) -> bool {
        self.ppid == 0 || self.kernel_thread
    }
}

/// Point-in-time copy of the process table.
///
/// Iteration order is the order the records were captured in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot(Vec<ProcessRecord>);

impl ProcessSnapshot {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self(records)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.0.iter().find(|record| record.pid == pid)
    }
}

impl FromIterator<ProcessRecord> for ProcessSnapshot {
    fn from_iter<T: IntoIterator<Item = ProcessRecord>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProcessSnapshot {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ProcessSnapshot {
    type Item = ProcessRecord;
    type IntoIter = std::vec::IntoIter<ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
