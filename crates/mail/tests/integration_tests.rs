//! Integration tests for the mail crate
//!
//! These tests drive complete transfers from item list to audit file.

use std::io::Cursor;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use mail::transfer::{PromptContinuation, RecordingSleeper};
use mail::{
    ConfirmMode, DelimitedFileSink, EmailAddress, FolderId, InMemoryMailClient, ItemId, MailItem,
    MoveOutcome, RECORD_COLUMNS, TransferContext, TransferError, TransferOptions,
    TransferOrchestrator, plan,
};
use tempfile::TempDir;

const SOURCE: &str = "alice@contoso.com";
const TARGET: &str = "archive@contoso.com";
const ACTING_USER: &str = "admin@contoso.com";

const MB: u64 = 1024 * 1024;

/// Helper to create test items
fn make_item(id: &str, size: u64, subject: &str) -> MailItem {
    MailItem::builder(ItemId::new(id), FolderId::new("AQMkInbox"))
        .size(size)
        .from(EmailAddress::with_name("Bob", "bob@fabrikam.com"))
        .subject(subject)
        .received_at(Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap())
        .build()
}

fn options(threshold: u64) -> TransferOptions {
    TransferOptions {
        threshold,
        wait_time: Duration::from_secs(300),
        check_target_empty: true,
        confirm: ConfirmMode::Automatic,
        quota_timeout: None,
    }
}

fn context() -> TransferContext {
    TransferContext::new(SOURCE, ACTING_USER)
}

#[test]
fn test_full_transfer_writes_audit_file() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("moves.csv");

    let client = InMemoryMailClient::new();
    let target = client.add_folder(TARGET, "Archive 2019", "AQMkArchive");
    client.script_counts(&target.id, [2, 0]);

    let items = vec![
        make_item("m1", 3 * MB, "Quarterly \"numbers\""),
        make_item("m2", 2 * MB, "Re: lunch; tomorrow"),
        make_item("m3", MB, "Invoice"),
    ];

    let sleeper = RecordingSleeper::new();
    let mut sink = DelimitedFileSink::new(&log_path, ';');
    let outcome = TransferOrchestrator::new(&client, &context(), options(4 * MB))
        .with_sleeper(&sleeper)
        .with_audit(&mut sink)
        .run(&items, TARGET, "Archive 2019");

    assert!(outcome.is_completed());
    let report = outcome.report();
    assert_eq!(report.items_moved, 3);
    assert_eq!(report.batches_planned, 2);
    assert_eq!(report.batches_completed, 2);
    assert_eq!(report.audit_location.as_deref(), Some(log_path.display().to_string().as_str()));

    // One quota wait between the two batches, none after the last
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(300)]);
    assert_eq!(client.count_queries(), 2);

    let moved: Vec<_> = client
        .moved()
        .into_iter()
        .map(|(item, folder)| (item.as_str().to_string(), folder.as_str().to_string()))
        .collect();
    assert_eq!(
        moved,
        vec![
            ("m1".to_string(), "AQMkArchive".to_string()),
            ("m2".to_string(), "AQMkArchive".to_string()),
            ("m3".to_string(), "AQMkArchive".to_string()),
        ]
    );

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);

    let header: Vec<String> = RECORD_COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect();
    assert_eq!(lines[0], header.join(";"));
    assert_eq!(
        lines[1],
        "\"alice@contoso.com\";\"AQMkInbox\";\"archive@contoso.com\";\"Archive 2019\";\
         \"AQMkArchive\";\"m1\";\"bob@fabrikam.com\";\"Quarterly \"\"numbers\"\"\";\
         \"2019-03-04T05:06:07Z\";\"3.00\";\"admin@contoso.com\""
    );
    assert!(lines[2].contains("\"Re: lunch; tomorrow\""));
    assert!(lines[3].contains("\"m3\""));
}

#[test]
fn test_existing_audit_file_stops_before_any_move() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("moves.csv");
    std::fs::write(&log_path, "previous run\n").unwrap();

    let client = InMemoryMailClient::new();
    client.add_folder(TARGET, "Archive", "AQMkArchive");
    let items = vec![make_item("m1", MB, "Hello")];

    let mut sink = DelimitedFileSink::new(&log_path, ';');
    let outcome = TransferOrchestrator::new(&client, &context(), options(4 * MB))
        .with_sleeper(&RecordingSleeper::new())
        .with_audit(&mut sink)
        .run(&items, TARGET, "Archive");

    let error = outcome.error().unwrap();
    assert!(matches!(error, TransferError::AuditLogExists { .. }));
    assert!(error.is_configuration());
    assert!(client.attempts().is_empty());
    assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "previous run\n");
}

#[test]
fn test_operator_stops_after_first_batch() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("moves.csv");

    let client = InMemoryMailClient::new();
    client.add_folder(TARGET, "Archive", "AQMkArchive");
    let items = vec![
        make_item("m1", 3 * MB, "One"),
        make_item("m2", 3 * MB, "Two"),
        make_item("m3", 3 * MB, "Three"),
    ];

    let mut transfer_options = options(3 * MB);
    transfer_options.check_target_empty = false;
    transfer_options.confirm = ConfirmMode::Interactive;

    // First answer is not exact and gets asked again
    let mut prompt = PromptContinuation::new(Cursor::new("y\nN\n"), Vec::new());
    let mut sink = DelimitedFileSink::new(&log_path, ',');
    let outcome = TransferOrchestrator::new(&client, &context(), transfer_options)
        .with_sleeper(&RecordingSleeper::new())
        .with_continuation(&mut prompt)
        .with_audit(&mut sink)
        .run(&items, TARGET, "Archive");

    assert!(outcome.is_aborted());
    assert_eq!(outcome.report().items_moved, 1);
    assert_eq!(outcome.report().batches_completed, 1);
    assert_eq!(client.attempts(), vec![ItemId::new("m1")]);

    let output = String::from_utf8(prompt.into_output()).unwrap();
    assert!(output.contains("Continue with batch 2 of 3?"));
    assert!(output.contains("Please answer Y or N."));

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_persistent_throttling_fails_and_keeps_partial_audit() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("moves.csv");

    let client = InMemoryMailClient::new();
    client.add_folder(TARGET, "Archive", "AQMkArchive");
    client.script_moves(
        &ItemId::new("m2"),
        [
            MoveOutcome::throttled(Duration::from_secs(2)),
            MoveOutcome::throttled(Duration::from_secs(2)),
            MoveOutcome::throttled(Duration::from_secs(2)),
        ],
    );
    let items = vec![
        make_item("m1", MB, "One"),
        make_item("m2", MB, "Two"),
        make_item("m3", MB, "Three"),
    ];

    let sleeper = RecordingSleeper::new();
    let mut sink = DelimitedFileSink::new(&log_path, ';');
    let outcome = TransferOrchestrator::new(&client, &context(), options(10 * MB))
        .with_sleeper(&sleeper)
        .with_audit(&mut sink)
        .run(&items, TARGET, "Archive");

    assert!(matches!(
        outcome.error(),
        Some(TransferError::ThrottleExhausted { attempts: 3, .. })
    ));
    assert_eq!(outcome.report().items_moved, 1);
    assert_eq!(client.attempts_for(&ItemId::new("m2")), 3);
    assert_eq!(client.attempts_for(&ItemId::new("m3")), 0);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(2100); 2]);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("\"m1\""));
}

#[test]
fn test_plan_matches_transfer_batches() {
    let items: Vec<MailItem> = [60u64, 50, 10, 200, 5]
        .iter()
        .enumerate()
        .map(|(i, size)| make_item(&format!("m{}", i + 1), *size, "x"))
        .collect();

    let batches = plan(&items, 100);
    let ids: Vec<Vec<&str>> = batches
        .iter()
        .map(|b| b.items().iter().map(|i| i.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["m1", "m2"], vec!["m3", "m4"], vec!["m5"]]);

    let client = InMemoryMailClient::new();
    client.add_folder(TARGET, "Archive", "AQMkArchive");
    let mut transfer_options = options(100);
    transfer_options.check_target_empty = false;

    let outcome = TransferOrchestrator::new(&client, &context(), transfer_options)
        .with_sleeper(&RecordingSleeper::new())
        .run(&items, TARGET, "Archive");

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().batches_planned, batches.len());
}

#[test]
fn test_empty_run_creates_no_audit_file() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("moves.csv");

    let client = InMemoryMailClient::new();
    client.add_folder(TARGET, "Archive", "AQMkArchive");

    let mut sink = DelimitedFileSink::new(&log_path, ';');
    let outcome = TransferOrchestrator::new(&client, &context(), options(MB))
        .with_sleeper(&RecordingSleeper::new())
        .with_audit(&mut sink)
        .run(&[], TARGET, "Archive");

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().items_moved, 0);
    assert_eq!(outcome.report().audit_location, None);
    assert!(!log_path.exists());
}
