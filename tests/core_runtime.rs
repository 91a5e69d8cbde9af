// tests/core_runtime.rs

use std::path::PathBuf;
use std::time::Duration;

use proptest::prelude::*;

use docwatch::engine::{
    BuildReport, CoreCommand, CoreRuntime, RuntimeEvent, RuntimeOptions, TriggerReason,
};

fn changed(path: &str) -> RuntimeEvent {
    RuntimeEvent::SourceChanged {
        paths: vec![PathBuf::from(path)],
        reason: TriggerReason::FileWatch,
    }
}

fn finished(id: u64, stdout: &str) -> RuntimeEvent {
    RuntimeEvent::BuildFinished(BuildReport {
        id,
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: Some(0),
        elapsed: Duration::from_millis(5),
    })
}

fn spawned_ids(commands: &[CoreCommand]) -> Vec<u64> {
    commands
        .iter()
        .filter_map(|c| match c {
            CoreCommand::SpawnBuild(req) => Some(req.id),
            _ => None,
        })
        .collect()
}

#[test]
fn each_change_spawns_one_build_with_fresh_id() {
    let mut core = CoreRuntime::new(RuntimeOptions::default());

    let first = core.step(changed("source/index.rst"));
    let second = core.step(changed("source/api.rst"));

    assert_eq!(spawned_ids(&first.commands), vec![1]);
    assert_eq!(spawned_ids(&second.commands), vec![2]);
    assert!(first.keep_running && second.keep_running);
    assert_eq!(core.tracker().in_flight(), 2);
}

#[test]
fn change_while_building_is_not_queued_or_merged() {
    let mut core = CoreRuntime::new(RuntimeOptions::default());

    core.step(changed("a.rst"));
    // Build 1 still in flight; the next change must start build 2 right away.
    let step = core.step(changed("a.rst"));

    match step.commands.as_slice() {
        [CoreCommand::SpawnBuild(req)] => {
            assert_eq!(req.id, 2);
            assert_eq!(req.reason, TriggerReason::FileWatch);
            assert_eq!(req.paths, vec![PathBuf::from("a.rst")]);
        }
        other => panic!("expected a single SpawnBuild, got {other:?}"),
    }
}

#[test]
fn finished_build_emits_its_report() {
    let mut core = CoreRuntime::new(RuntimeOptions::default());
    core.step(changed("a.rst"));

    let step = core.step(finished(1, "BUILD OK"));

    match step.commands.as_slice() {
        [CoreCommand::EmitReport(report)] => assert_eq!(report.stdout, "BUILD OK"),
        other => panic!("expected a single EmitReport, got {other:?}"),
    }
    assert!(step.keep_running);
    assert!(core.tracker().is_idle());
    assert_eq!(core.tracker().finished(), 1);
}

#[test]
fn unknown_report_is_still_emitted() {
    let mut core = CoreRuntime::new(RuntimeOptions::default());

    let step = core.step(finished(42, "late"));

    assert!(matches!(step.commands.as_slice(), [CoreCommand::EmitReport(_)]));
    assert_eq!(core.tracker().finished(), 0);
}

#[test]
fn exit_when_idle_waits_for_all_builds() {
    let mut core = CoreRuntime::new(RuntimeOptions {
        exit_when_idle: true,
    });
    core.step(changed("a.rst"));
    core.step(changed("b.rst"));

    let step = core.step(finished(2, ""));
    assert!(step.keep_running, "build 1 is still in flight");

    let step = core.step(finished(1, ""));
    assert!(!step.keep_running);
    assert!(matches!(
        step.commands.as_slice(),
        [CoreCommand::EmitReport(_), CoreCommand::RequestExit]
    ));
}

#[test]
fn shutdown_stops_without_commands() {
    let mut core = CoreRuntime::new(RuntimeOptions::default());
    core.step(changed("a.rst"));

    let step = core.step(RuntimeEvent::ShutdownRequested);

    assert!(step.commands.is_empty());
    assert!(!step.keep_running);
}

/// Interleaving of changes and completions of the oldest in-flight build.
#[derive(Debug, Clone)]
enum Op {
    Change,
    CompleteOldest,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Change), Just(Op::CompleteOldest)]
}

proptest! {
    #[test]
    fn invocation_count_equals_event_count(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        let mut in_flight: Vec<u64> = Vec::new();
        let mut changes = 0usize;
        let mut spawned = Vec::new();

        for op in ops {
            match op {
                Op::Change => {
                    changes += 1;
                    let step = core.step(changed("x.rst"));
                    let ids = spawned_ids(&step.commands);
                    prop_assert_eq!(ids.len(), 1);
                    in_flight.extend(ids.iter().copied());
                    spawned.extend(ids);
                }
                Op::CompleteOldest => {
                    if !in_flight.is_empty() {
                        let id = in_flight.remove(0);
                        let step = core.step(finished(id, ""));
                        prop_assert!(spawned_ids(&step.commands).is_empty());
                    }
                }
            }
            prop_assert_eq!(core.tracker().in_flight(), in_flight.len());
        }

        prop_assert_eq!(spawned.len(), changes);
        prop_assert_eq!(core.tracker().started() as usize, changes);

        // Ids are unique and strictly increasing.
        prop_assert!(spawned.windows(2).all(|w| w[0] < w[1]));
    }
}
