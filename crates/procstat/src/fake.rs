//! Scripted process table for exercising code that depends on
//! [`Introspector`] without touching the running system.

use crate::{Error, Introspector, MemoryRegion, ProcessRecord, ProcessSnapshot};
use procfs::ProcError;
use std::{cell::Cell, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeExecutable {
    Path(PathBuf),
    /// No path can be reported for the image.
    Missing,
    /// Reading the executable fails for a reason other than absence.
    Denied,
}

#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub record: ProcessRecord,
    pub executable: FakeExecutable,
    pub alive: bool,
    pub arguments: Option<String>,
    pub regions: Option<Vec<MemoryRegion>>,
    pub lookup_denied: bool,
}

impl FakeProcess {
    /// A live user space process running `/usr/bin/<comm>` with no mappings.
    pub fn new(pid: u32, ppid: u32, comm: &str) -> Self {
        Self {
            record: ProcessRecord {
                pid,
                ppid,
                pgid: pid,
                comm: comm.into(),
                ..Default::default()
            },
            executable: FakeExecutable::Path(PathBuf::from("/usr/bin").join(comm)),
            alive: true,
            arguments: Some(comm.into()),
            regions: Some(Vec::new()),
            lookup_denied: false,
        }
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = FakeExecutable::Path(path.into());
        self
    }

    pub fn with_missing_executable(mut self) -> Self {
        self.executable = FakeExecutable::Missing;
        self
    }

    pub fn with_denied_executable(mut self) -> Self {
        self.executable = FakeExecutable::Denied;
        self
    }

    /// The process exits right after the snapshot was taken.
    pub fn exited(mut self) -> Self {
        self.alive = false;
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    pub fn without_arguments(mut self) -> Self {
        self.arguments = None;
        self
    }

    pub fn with_regions(mut self, regions: Vec<MemoryRegion>) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn without_regions(mut self) -> Self {
        self.regions = None;
        self
    }

    pub fn with_uid(mut self, uid: u32) -> Self {
        self.record.uid = uid;
        self
    }

    pub fn with_jail(mut self, jid: u64) -> Self {
        self.record.jid = jid;
        self
    }

    pub fn with_group(mut self, pgid: u32) -> Self {
        self.record.pgid = pgid;
        self
    }

    pub fn kernel_thread(mut self) -> Self {
        self.record.kernel_thread = true;
        self
    }

    pub fn zombie(mut self) -> Self {
        self.record.zombie = true;
        self
    }

    pub fn with_denied_lookup(mut self) -> Self {
        self.lookup_denied = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeIntrospector {
    processes: Vec<FakeProcess>,
    users: Vec<(u32, String)>,
    unavailable: bool,
    region_queries: Cell<usize>,
}

impl FakeIntrospector {
    pub fn new(processes: Vec<FakeProcess>) -> Self {
        Self {
            processes,
            ..Default::default()
        }
    }

    pub fn with_user(mut self, uid: u32, name: &str) -> Self {
        self.users.push((uid, name.into()));
        self
    }

    /// Every query fails as if procfs were not mounted.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// How many times a memory map was requested.
    pub fn region_queries(&self) -> usize {
        self.region_queries.get()
    }

    fn find(&self, pid: u32) -> Option<&FakeProcess> {
        self.processes
            .iter()
            .find(|process| process.record.pid == pid && process.alive)
    }
}

impl Introspector for FakeIntrospector {
    fn list_all(&self) -> Result<ProcessSnapshot, Error> {
        if self.unavailable {
            return Err(Error::Unavailable(ProcError::Other(
                "process table unavailable".into(),
            )));
        }
        Ok(self
            .processes
            .iter()
            .map(|process| process.record.clone())
            .collect())
    }

    fn lookup(&self, pid: u32) -> Result<ProcessRecord, Error> {
        let process = self.find(pid).ok_or(Error::NotFound(pid))?;
        if process.lookup_denied {
            return Err(Error::PermissionDenied(pid));
        }
        Ok(process.record.clone())
    }

    fn executable(&self, pid: u32) -> Result<Option<PathBuf>, Error> {
        let Some(process) = self.find(pid) else {
            return Ok(None);
        };
        match &process.executable {
            FakeExecutable::Path(path) => Ok(Some(path.clone())),
            FakeExecutable::Missing => Ok(None),
            FakeExecutable::Denied => Err(Error::PermissionDenied(pid)),
        }
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.find(pid).is_some()
    }

    fn arguments(&self, pid: u32) -> Result<String, Error> {
        self.find(pid)
            .and_then(|process| process.arguments.clone())
            .ok_or(Error::PermissionDenied(pid))
    }

    fn memory_regions(&self, pid: u32) -> Result<Vec<MemoryRegion>, Error> {
        self.region_queries.set(self.region_queries.get() + 1);
        let process = self.find(pid).ok_or(Error::NotFound(pid))?;
        process.regions.clone().ok_or(Error::PermissionDenied(pid))
    }

    fn user_id(&self, name: &str) -> Result<Option<u32>, Error> {
        Ok(self
            .users
            .iter()
            .find(|(_, user)| user == name)
            .map(|(uid, _)| *uid))
    }

    fn user_name(&self, uid: u32) -> Option<String> {
        self.users
            .iter()
            .find(|(id, _)| *id == uid)
            .map(|(_, name)| name.clone())
    }
}
