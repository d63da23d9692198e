#![forbid(unsafe_code)]

use config::ProcSelector;
use detector::{Finding, Reason, RestartDetector, RunReport, Settings};
use pretty_assertions::assert_eq;
use procstat::fake::{FakeIntrospector, FakeProcess};
use procstat::{Backing, MemoryRegion, Protection};
use proptest::prelude::*;

fn code(start: u64, path: &str) -> MemoryRegion {
    MemoryRegion {
        start,
        end: start + 0x1000,
        protection: Protection::READ | Protection::EXECUTE,
        backing: Backing::File,
        path: path.into(),
    }
}

fn run(facility: &FakeIntrospector, settings: Settings) -> (Vec<Finding>, RunReport) {
    let mut findings = Vec::new();
    let report = RestartDetector::new(facility, settings)
        .run(&mut findings)
        .unwrap();
    (findings, report)
}

#[test]
fn scenario_a_deleted_library() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(4200, 1, "nginx")
            .with_executable("/usr/sbin/nginx")
            .with_regions(vec![code(0x5000, "")]),
    ])
    .with_user(0, "root");

    let (findings, report) = run(&facility, Settings::default());

    assert_eq!(
        findings,
        vec![Finding {
            pid: 4200,
            jid: 0,
            uid: 0,
            user: "root".into(),
            command: "nginx".into(),
            reason: Reason::MissingLibrary,
            evidence: "/usr/sbin/nginx".into(),
        }]
    );
    assert!(report.is_success());
}

#[test]
fn scenario_b_deleted_executable() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(4300, 1, "worker")
            .with_missing_executable()
            .with_arguments("worker --config=/etc/x"),
    ]);

    let (findings, _) = run(&facility, Settings::default());

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].pid, 4300);
    assert_eq!(findings[0].reason, Reason::MissingExecutable);
    assert_eq!(findings[0].evidence, "worker --config=/etc/x");
}

#[test]
fn scenario_c_exited_process() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(4400, 1, "short").with_missing_executable().exited(),
    ]);

    let (findings, report) = run(&facility, Settings::default());

    assert!(findings.is_empty());
    // still evaluated, the run itself succeeds
    assert_eq!(report.evaluated, 1);
}

#[test]
fn scenario_d_kernel_placeholder() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(0, 0, "swapper")
            .with_missing_executable()
            .with_regions(vec![code(0x1000, "")]),
    ]);

    let (findings, _) = run(&facility, Settings::default());
    assert!(findings.is_empty());
}

#[test]
fn scenario_e_unknown_pid_in_list() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(4300, 1, "worker").with_missing_executable(),
    ]);
    let settings = Settings {
        selectors: vec![ProcSelector::Pid(9999), ProcSelector::Pid(4300)],
        ..Default::default()
    };

    let (findings, report) = run(&facility, settings);

    assert_eq!(findings.len(), 1);
    assert_eq!(report.unmatched, vec![ProcSelector::Pid(9999)]);
    assert!(report.is_success());
}

#[test]
fn nothing_matched_is_a_failed_run() {
    let facility = FakeIntrospector::new(vec![FakeProcess::new(10, 1, "sshd")]);
    let settings = Settings {
        selectors: vec![ProcSelector::Name("httpd".into())],
        ..Default::default()
    };

    let (findings, report) = run(&facility, settings);

    assert!(findings.is_empty());
    assert!(!report.is_success());
}

#[test]
fn findings_follow_snapshot_order() {
    let facility = FakeIntrospector::new(vec![
        FakeProcess::new(300, 1, "c").with_missing_executable(),
        FakeProcess::new(100, 1, "a").with_regions(vec![code(0x1000, "")]),
        FakeProcess::new(200, 1, "b"),
        FakeProcess::new(150, 1, "d").with_missing_executable(),
    ]);

    let (findings, report) = run(&facility, Settings::default());

    let pids: Vec<_> = findings.iter().map(|f| f.pid).collect();
    assert_eq!(pids, [300, 100, 150]);
    assert_eq!(report.findings, 3);
}

#[derive(Debug, Clone)]
enum Exe {
    Present,
    Missing,
    Denied,
}

prop_compose! {
    fn arbitrary_region()(
        executable in any::<bool>(),
        backing in prop_oneof![
            Just(Backing::File),
            Just(Backing::Anonymous),
            Just(Backing::SharedMemory),
        ],
        unlinked in any::<bool>(),
    ) -> (bool, Backing, bool) {
        (executable, backing, unlinked)
    }
}

prop_compose! {
    fn arbitrary_process(pid: u32)(
        ppid in prop_oneof![Just(0u32), 1u32..100],
        exe in prop_oneof![Just(Exe::Present), Just(Exe::Missing), Just(Exe::Denied)],
        alive in any::<bool>(),
        regions in prop::collection::vec(arbitrary_region(), 0..8),
    ) -> FakeProcess {
        let regions = regions
            .into_iter()
            .enumerate()
            .map(|(i, (executable, backing, unlinked))| MemoryRegion {
                start: i as u64 * 0x1000,
                end: (i as u64 + 1) * 0x1000,
                protection: if executable {
                    Protection::READ | Protection::EXECUTE
                } else {
                    Protection::READ
                },
                backing,
                path: if unlinked { String::new() } else { format!("/lib/l{i}.so") },
            })
            .collect();
        let process = FakeProcess::new(pid, ppid, "p").with_regions(regions);
        let process = match exe {
            Exe::Present => process,
            Exe::Missing => process.with_missing_executable(),
            Exe::Denied => process.with_denied_executable(),
        };
        if alive { process } else { process.exited() }
    }
}

fn arbitrary_table() -> impl Strategy<Value = Vec<FakeProcess>> {
    (1usize..12).prop_flat_map(|n| {
        (1..=n as u32)
            .map(arbitrary_process)
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn detection_invariants(table in arbitrary_table(), binary_only in any::<bool>()) {
        let facility = FakeIntrospector::new(table.clone());
        let settings = Settings { binary_only, ..Default::default() };

        let (findings, _) = run(&facility, settings.clone());

        for process in &table {
            let pid = process.record.pid;
            let mine: Vec<_> = findings.iter().filter(|f| f.pid == pid).collect();
            prop_assert!(mine.len() <= 1);

            let expected = if process.record.ppid == 0 || !process.alive {
                None
            } else {
                match process.executable {
                    procstat::fake::FakeExecutable::Missing => Some(Reason::MissingExecutable),
                    procstat::fake::FakeExecutable::Denied => None,
                    procstat::fake::FakeExecutable::Path(_) if binary_only => None,
                    procstat::fake::FakeExecutable::Path(_) => process
                        .regions
                        .iter()
                        .flatten()
                        .any(MemoryRegion::is_unlinked_code)
                        .then_some(Reason::MissingLibrary),
                }
            };
            prop_assert_eq!(mine.first().map(|f| f.reason), expected);
        }

        // same table, same answer
        let (again, _) = run(&facility, settings);
        prop_assert_eq!(findings, again);
    }
}
