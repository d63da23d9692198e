use bitflags::bitflags;

bitflags! {
    /// Access permissions of a mapped region.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Protection: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
    }
}

/// What a mapped region is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backing {
    /// A regular file on some filesystem.
    File,
    /// Heap, stack and other memory with no backing object.
    #[default]
    Anonymous,
    /// A device node.
    Device,
    /// memfd, SysV and other shared memory objects that are never linked.
    SharedMemory,
    /// Kernel provided pages such as the vdso.
    Special,
}

/// A contiguous range of a process address space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: u64,
    pub end: u64,
    pub protection: Protection,
    pub backing: Backing,
    /// Path of the backing object. Empty if the file was removed while still
    /// mapped.
    pub path: String,
}

impl MemoryRegion {
    /// Executable code mapped from a file that no longer exists on disk.
    ///
    /// ```
    /// # use procstat::{Backing, MemoryRegion, Protection};
    /// let region = MemoryRegion {
    ///     protection: Protection::READ | Protection::EXECUTE,
    ///     backing: Backing::File,
    ///     ..Default::default()
    /// };
    /// assert!(region.is_unlinked_code());
    /// ```
    #[inline]
    pub fn is_unlinked_code(&self) -> bool {
        self.protection.contains(Protection::EXECUTE)
            && self.backing == Backing::File
            && self.path.is_empty()
    }
}
