use crate::{
    Backing, Error, Introspector, MemoryRegion, ProcessRecord, ProcessSnapshot, Protection,
    utils::{EVIDENCE_MAX, bounded, live_path},
};
use nix::{
    errno::Errno,
    sys::signal::kill,
    unistd::{Pid, Uid, User},
};
use procfs::{
    ProcError,
    process::{MMPermissions, MMapPath, Process, all_processes},
};
use std::{ffi::OsStr, os::unix::ffi::OsStrExt, path::PathBuf};
use tracing::{debug, trace};

/// `PF_KTHREAD` from `include/linux/sched.h`.
const PF_KTHREAD: u32 = 0x0020_0000;

/// Process introspection backed by Linux `/proc`.
///
/// Containers are identified by pid namespace: a process sharing our pid
/// namespace gets jail id `0`, any other process gets the inode number of its
/// namespace.
#[derive(Debug)]
pub struct Procfs {
    host_pid_ns: Option<u64>,
}

impl Procfs {
    /// Fails if procfs is not mounted or cannot be read.
    pub fn open() -> Result<Self, Error> {
        let myself = Process::myself().map_err(Error::Unavailable)?;
        Ok(Self {
            host_pid_ns: pid_namespace(&myself),
        })
    }

    fn process(pid: u32) -> Result<Process, Error> {
        let raw = i32::try_from(pid).map_err(|_| Error::NotFound(pid))?;
        Process::new(raw).map_err(|err| Error::from_proc(pid, err))
    }

    fn record(&self, process: &Process) -> Result<ProcessRecord, ProcError> {
        let stat = process.stat()?;
        let uid = process.uid()?;
        // Namespaces of other users' processes are only readable with
        // ptrace access; those fall back to the host.
        let jid = match (pid_namespace(process), self.host_pid_ns) {
            (Some(ns), Some(host)) if ns != host => ns,
            _ => 0,
        };

        Ok(ProcessRecord {
            pid: stat.pid as u32,
            ppid: stat.ppid as u32,
            pgid: stat.pgrp as u32,
            jid,
            uid,
            comm: stat.comm,
            kernel_thread: stat.flags & PF_KTHREAD != 0,
            zombie: stat.state == 'Z',
        })
    }
}

impl Introspector for Procfs {
    fn list_all(&self) -> Result<ProcessSnapshot, Error> {
        let processes = all_processes().map_err(Error::Unavailable)?;

        let snapshot = processes
            .filter_map(|process| match process.and_then(|p| self.record(&p)) {
                Ok(record) => Some(record),
                Err(err) => {
                    debug!(%err, "Skipping process table entry");
                    None
                }
            })
            .collect();
        Ok(snapshot)
    }

    fn lookup(&self, pid: u32) -> Result<ProcessRecord, Error> {
        let process = Self::process(pid)?;
        self.record(&process).map_err(|err| Error::from_proc(pid, err))
    }

    fn executable(&self, pid: u32) -> Result<Option<PathBuf>, Error> {
        let exe = Self::process(pid).and_then(|process| {
            process.exe().map_err(|err| Error::from_proc(pid, err))
        });

        match exe {
            Ok(path) => Ok(live_path(&path).map(|path| path.to_path_buf())),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        // EPERM still proves the process exists.
        !matches!(kill(Pid::from_raw(raw), None), Err(Errno::ESRCH))
    }

    fn arguments(&self, pid: u32) -> Result<String, Error> {
        let cmdline = Self::process(pid)?
            .cmdline()
            .map_err(|err| Error::from_proc(pid, err))?;
        Ok(bounded(cmdline.join(" "), EVIDENCE_MAX))
    }

    fn memory_regions(&self, pid: u32) -> Result<Vec<MemoryRegion>, Error> {
        let maps = Self::process(pid)?
            .maps()
            .map_err(|err| Error::from_proc(pid, err))?;

        let regions = maps
            .into_iter()
            .map(|map| region(map.address, map.perms, &map.pathname))
            .collect();
        Ok(regions)
    }

    fn user_id(&self, name: &str) -> Result<Option<u32>, Error> {
        Ok(User::from_name(name)?.map(|user| user.uid.as_raw()))
    }

    fn user_name(&self, uid: u32) -> Option<String> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(user) => user.map(|user| user.name),
            Err(err) => {
                trace!(uid, %err, "User lookup failed");
                None
            }
        }
    }
}

fn pid_namespace(process: &Process) -> Option<u64> {
    let namespaces = process.namespaces().ok()?;
    namespaces
        .0
        .get(OsStr::new("pid"))
        .map(|namespace| namespace.identifier)
}

/// Translate one line of `/proc/<pid>/maps`.
pub(crate) fn region(address: (u64, u64), perms: MMPermissions, pathname: &MMapPath) -> MemoryRegion {
    let mut protection = Protection::empty();
    protection.set(Protection::READ, perms.contains(MMPermissions::READ));
    protection.set(Protection::WRITE, perms.contains(MMPermissions::WRITE));
    protection.set(Protection::EXECUTE, perms.contains(MMPermissions::EXECUTE));

    let (backing, path) = match pathname {
        MMapPath::Path(path) => {
            let bytes = path.as_os_str().as_bytes();
            let backing = if bytes.starts_with(b"/memfd:")
                || bytes.starts_with(b"/SYSV")
                || bytes.starts_with(b"/dev/zero")
            {
                Backing::SharedMemory
            } else if bytes.starts_with(b"/dev/") {
                Backing::Device
            } else {
                Backing::File
            };
            let path = live_path(path)
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_default();
            (backing, path)
        }
        MMapPath::Anonymous | MMapPath::Heap | MMapPath::Stack | MMapPath::TStack(_) => {
            (Backing::Anonymous, String::new())
        }
        other => (Backing::Special, format!("{other:?}")),
    };

    MemoryRegion {
        start: address.0,
        end: address.1,
        protection,
        backing,
        path,
    }
}
