use HandoffQueueMini::core::buildcore::{HandoffConfig, HandoffError, HandoffSystem, Role, RunReport};
use HandoffQueueMini::core::log::{append_logs, DrainEntry};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_test::traced_test;

#[test]
#[ntest::timeout(60000)]
fn test_default_run_processes_every_item() {
    let outcome = HandoffSystem::default().run().unwrap();
    let report = outcome.report;

    assert_eq!(report.items_produced, 100_000);
    assert_eq!(report.items_consumed, 100_000);
    assert!(report.batches >= 1);
    assert!(report.wakeups >= report.batches);
    assert!(report.elapsed_secs >= 0.0);
    assert!(outcome.drain_log.is_none());

    let line = report.summary_line();
    let seconds = line
        .strip_prefix("Processing completed in ")
        .and_then(|rest| rest.strip_suffix(" seconds."))
        .unwrap();
    assert!(seconds.parse::<f64>().unwrap() >= 0.0);
}

#[test]
#[ntest::timeout(30000)]
fn test_consumer_sees_items_in_production_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let config = HandoffConfig::default().with_item_count(10_000);
    HandoffSystem::new(config)
        .run_with(move |item: u64| sink.lock().unwrap().push(item))
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, (1..=10_000).collect::<Vec<u64>>());
}

#[test]
#[ntest::timeout(10000)]
fn test_zero_items_run_completes() {
    let config = HandoffConfig::default().with_item_count(0);
    let report = HandoffSystem::new(config).run().unwrap().report;

    assert_eq!(report.items_produced, 0);
    assert_eq!(report.items_consumed, 0);
    assert_eq!(report.batches, 0);
}

#[test]
#[ntest::timeout(30000)]
fn test_batch_recording_accounts_for_every_item() {
    let config = HandoffConfig::default()
        .with_item_count(5_000)
        .with_batch_recording(true)
        .with_stall_timeout(Duration::from_secs(10));
    let outcome = HandoffSystem::new(config).run().unwrap();

    let log = outcome.drain_log.unwrap();
    assert_eq!(log.total_items(), 5_000);
    assert_eq!(log.len() as u64, outcome.report.wakeups);

    let (last, earlier) = log.entries().split_last().unwrap();
    assert!(last.done_observed);
    assert!(earlier.iter().all(|entry| entry.size > 0 || entry.done_observed));
}

#[test]
#[ntest::timeout(10000)]
fn test_panicking_processor_is_reported() {
    let config = HandoffConfig::default().with_item_count(10);
    let result = HandoffSystem::new(config).run_with(|item: u64| {
        if item == 3 {
            panic!("processor failed on {item}");
        }
    });

    assert!(matches!(result, Err(HandoffError::WorkerPanicked { role: Role::Consumer })));
}

#[test]
#[traced_test]
fn test_run_logs_completion() {
    let config = HandoffConfig::default().with_item_count(100);
    HandoffSystem::new(config).run().unwrap();

    assert!(logs_contain("handoff run complete"));
}

#[test]
fn test_report_written_as_ndjson() {
    let path = std::env::temp_dir().join(format!("handoff-report-{}.ndjson", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let config = HandoffConfig::default().with_item_count(50).with_batch_recording(true);
    let outcome = HandoffSystem::new(config).run().unwrap();
    let drains = outcome.drain_log.unwrap();

    append_logs(std::slice::from_ref(&outcome.report), &path).unwrap();
    append_logs(drains.entries(), &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();

    let report: RunReport = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(report.items_produced, outcome.report.items_produced);
    assert_eq!(report.items_consumed, outcome.report.items_consumed);
    assert_eq!(report.batches, outcome.report.batches);
    assert!((report.elapsed_secs - outcome.report.elapsed_secs).abs() < 1e-9);

    let entries: Vec<DrainEntry> = lines.map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(entries, drains.entries());

    std::fs::remove_file(&path).unwrap();
}
