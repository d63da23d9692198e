#![forbid(unsafe_code)]

use crate::{
    Error, Finding, FindingSink, Reason, Settings,
    resolver::{ExecutableResolver, Resolution},
    scanner::MemoryMapScanner,
};
use config::ProcSelector;
use procstat::{Introspector, ProcessRecord, ProcessSnapshot, utils};
use tracing::{debug, info, trace, warn};

/// Why a process was not checked to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Kernel,
    Zombie,
    Jail,
    User,
    /// Exited between the snapshot and the check.
    Vanished,
    /// Executable could not be read for reasons other than absence.
    Unreadable,
}

/// Verdict for a single process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Excluded(Exclusion),
    Clean,
    Reported(Finding),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    LookupFailed { pid: u32, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Processes that passed selection, whether or not they were reported.
    pub evaluated: usize,
    pub findings: usize,
    /// Selectors no process matched.
    pub unmatched: Vec<ProcSelector>,
    pub warnings: Vec<ScanWarning>,
}

impl RunReport {
    /// The selection matched at least one process.
    pub fn is_success(&self) -> bool {
        self.evaluated > 0
    }
}

/// Walks the process table and reports processes running deleted code.
pub struct RestartDetector<'a> {
    facility: &'a dyn Introspector,
    settings: Settings,
    resolver: ExecutableResolver<'a>,
    scanner: MemoryMapScanner<'a>,
}

impl<'a> RestartDetector<'a> {
    pub fn new(facility: &'a dyn Introspector, settings: Settings) -> Self {
        Self {
            facility,
            settings,
            resolver: ExecutableResolver::new(facility),
            scanner: MemoryMapScanner::new(facility),
        }
    }

    /// Check every selected process, handing findings to `sink` in snapshot
    /// order.
    ///
    /// Only a process table that cannot be read at all, or a failing sink,
    /// aborts the run.
    pub fn run(&self, sink: &mut dyn FindingSink) -> Result<RunReport, Error> {
        let span = tracing::debug_span!("checkrestart_run");
        let _enter = span.enter();

        let mut report = RunReport::default();
        let snapshot = self.capture(&mut report)?;
        debug!(processes = snapshot.len(), "Captured process table");

        let mut matched = vec![false; self.settings.selectors.len()];
        for record in &snapshot {
            if !self.select(record, &mut matched) {
                continue;
            }
            report.evaluated += 1;

            match self.check(record) {
                Outcome::Reported(finding) => {
                    debug!(pid = finding.pid, reason = %finding.reason, "Needs restart");
                    sink.accept(finding)?;
                    report.findings += 1;
                }
                Outcome::Excluded(exclusion) => {
                    trace!(pid = record.pid, ?exclusion, "Excluded");
                }
                Outcome::Clean => trace!(pid = record.pid, "Clean"),
            }
        }

        report.unmatched = self
            .settings
            .selectors
            .iter()
            .zip(matched)
            .filter(|(_, matched)| !matched)
            .map(|(selector, _)| selector.clone())
            .collect();
        for selector in &report.unmatched {
            warn!(%selector, "No process matched");
        }

        info!(
            evaluated = report.evaluated,
            findings = report.findings,
            "Finished checking processes"
        );
        Ok(report)
    }

    /// Decide whether `record` needs a restart.
    ///
    /// Selection by explicit process list is not applied here.
    pub fn check(&self, record: &ProcessRecord) -> Outcome {
        if record.is_kernel() {
            return Outcome::Excluded(Exclusion::Kernel);
        }
        if record.zombie {
            return Outcome::Excluded(Exclusion::Zombie);
        }
        if self.settings.jail.is_some_and(|jid| jid != record.jid) {
            return Outcome::Excluded(Exclusion::Jail);
        }
        if self.settings.uid.is_some_and(|uid| uid != record.uid) {
            return Outcome::Excluded(Exclusion::User);
        }

        let path = match self.resolver.resolve(record.pid) {
            Resolution::Resolved(path) => path,
            Resolution::Missing { evidence } => {
                return Outcome::Reported(self.finding(
                    record,
                    Reason::MissingExecutable,
                    evidence,
                ));
            }
            Resolution::Vanished => return Outcome::Excluded(Exclusion::Vanished),
            Resolution::Unreadable(err) => {
                debug!(pid = record.pid, %err, "Cannot read executable");
                return Outcome::Excluded(Exclusion::Unreadable);
            }
        };

        if self.settings.binary_only {
            return Outcome::Clean;
        }

        match self.scanner.scan(record.pid) {
            Some(region) => {
                debug!(
                    pid = record.pid,
                    start = region.start,
                    end = region.end,
                    "Found unlinked executable mapping"
                );
                let evidence = utils::bounded(
                    path.to_string_lossy().into_owned(),
                    utils::EVIDENCE_MAX,
                );
                Outcome::Reported(self.finding(record, Reason::MissingLibrary, evidence))
            }
            None => Outcome::Clean,
        }
    }

    fn finding(&self, record: &ProcessRecord, reason: Reason, evidence: String) -> Finding {
        Finding {
            pid: record.pid,
            jid: record.jid,
            uid: record.uid,
            user: self
                .facility
                .user_name(record.uid)
                .unwrap_or_else(|| record.uid.to_string()),
            command: record.comm.clone(),
            reason,
            evidence,
        }
    }

    /// Take the whole table, or only the listed pids when the selection is
    /// made of pids alone.
    fn capture(&self, report: &mut RunReport) -> Result<ProcessSnapshot, Error> {
        let Some(pids) = self.settings.pid_list() else {
            return Ok(self.facility.list_all()?);
        };

        let mut records: Vec<ProcessRecord> = Vec::with_capacity(pids.len());
        for pid in pids {
            if records.iter().any(|record| record.pid == pid) {
                continue;
            }
            match self.facility.lookup(pid) {
                Ok(record) => records.push(record),
                Err(procstat::Error::NotFound(_)) => {}
                Err(err) => {
                    warn!(pid, %err, "Failed to look up process");
                    report.warnings.push(ScanWarning::LookupFailed {
                        pid,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(ProcessSnapshot::new(records))
    }

    /// Apply the explicit process list, marking every selector that matches.
    fn select(&self, record: &ProcessRecord, matched: &mut [bool]) -> bool {
        if self.settings.selectors.is_empty() {
            return true;
        }

        let mut selected = false;
        for (selector, hit) in self.settings.selectors.iter().zip(matched.iter_mut()) {
            if selector.matches(record.pid, record.pgid, &record.comm) {
                *hit = true;
                selected = true;
            }
        }
        selected
    }
}
