//! `ferry move`

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use log::{info, warn};
use mail::{
    DelimitedFileSink, RemoteMailClient, TransferOrchestrator, TransferOutcome, TransferReport,
    TransferSettings,
};

use crate::cli::MoveArgs;
use crate::progress::IndicatifProgress;
use crate::prompt::DialoguerPrompt;

/// Apply command-line overrides to the stored settings
pub(crate) fn effective_settings(args: &MoveArgs, mut settings: TransferSettings) -> TransferSettings {
    if let Some(batch_size) = args.batch_size {
        settings.batch_size = batch_size;
    }
    if let Some(wait_time) = args.wait_time {
        settings.wait_time_secs = wait_time;
    }
    if args.no_check_target_empty {
        settings.check_target_empty = false;
    }
    if args.no_confirm {
        settings.confirm = false;
    }
    if let Some(log) = &args.log {
        settings.audit_log = Some(log.clone());
    }
    if let Some(delimiter) = args.delimiter {
        settings.delimiter = delimiter;
    }
    if let Some(timeout) = args.quota_timeout {
        settings.quota_timeout_secs = Some(timeout);
    }
    settings
}

pub fn execute(args: MoveArgs) -> Result<()> {
    let settings = effective_settings(&args, TransferSettings::load()?);
    let client = super::connect(&args.source_mailbox)?;

    let source = client
        .bind(&args.source_folder, &args.source_mailbox)
        .with_context(|| format!("Failed to open source folder '{}'", args.source_folder))?;

    let spinner = ProgressBar::new_spinner().with_message(format!("Listing items in {}…", source.name));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let items = client.list_items(&source, args.filter.as_deref(), |fetched| {
        spinner.set_message(format!("Listing items in {}… {}", source.name, fetched));
    });
    spinner.finish_and_clear();
    let items = items?;

    let total: u64 = items.iter().map(|i| i.size).sum();
    info!(
        "Found {} items ({} bytes) in {}",
        items.len(),
        total,
        source.name
    );

    let context = client.session().transfer_context();
    let logging = settings.audit_log.is_some();
    let mut progress = IndicatifProgress::new();
    let mut prompt = DialoguerPrompt::new();
    let mut sink = settings
        .audit_log
        .as_ref()
        .map(|path| DelimitedFileSink::new(path, settings.delimiter));

    let mut orchestrator = TransferOrchestrator::new(&client, &context, settings.to_options())
        .with_progress(&mut progress)
        .with_continuation(&mut prompt);
    if let Some(sink) = sink.as_mut() {
        orchestrator = orchestrator.with_audit(sink);
    }

    let outcome = orchestrator.run(&items, &args.target_mailbox, &args.target_folder);
    client.disconnect();

    match outcome {
        TransferOutcome::Completed(report) => {
            println!("Moved {} items in {} batches.", report.items_moved, report.batches_completed);
            print_audit_location(&report, logging);
            Ok(())
        }
        TransferOutcome::Aborted(report) => {
            println!(
                "Stopped after {} of {} batches; {} items moved.",
                report.batches_completed, report.batches_planned, report.items_moved
            );
            print_audit_location(&report, logging);
            Ok(())
        }
        TransferOutcome::Failed { error, report } => {
            if report.items_moved > 0 {
                warn!("{} items were moved before the failure", report.items_moved);
                print_audit_location(&report, logging);
            }
            if error.is_configuration() {
                bail!("Transfer not started: {}", error);
            }
            Err(error).context("Transfer failed")
        }
    }
}

fn print_audit_location(report: &TransferReport, logging: bool) {
    if let Some(summary) = audit_summary(report, logging) {
        println!("{}", summary);
    }
}

/// Where the audit records went, if logging was requested
fn audit_summary(report: &TransferReport, logging: bool) -> Option<String> {
    match &report.audit_location {
        Some(location) => Some(format!("Audit log written to {}", location)),
        None if logging => Some("No audit log created; nothing was moved.".to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> MoveArgs {
        MoveArgs {
            source_mailbox: "alice@contoso.com".to_string(),
            source_folder: "Inbox".to_string(),
            target_mailbox: "alice@contoso.com".to_string(),
            target_folder: "Archive".to_string(),
            filter: None,
            batch_size: None,
            wait_time: None,
            no_check_target_empty: false,
            no_confirm: false,
            log: None,
            delimiter: None,
            quota_timeout: None,
        }
    }

    #[test]
    fn test_settings_kept_without_flags() {
        let stored = TransferSettings {
            batch_size: 1000,
            audit_log: Some(PathBuf::from("stored.csv")),
            ..TransferSettings::default()
        };

        assert_eq!(effective_settings(&args(), stored.clone()), stored);
    }

    #[test]
    fn test_flags_override_settings() {
        let mut args = args();
        args.batch_size = Some(42);
        args.wait_time = Some(10);
        args.no_check_target_empty = true;
        args.no_confirm = true;
        args.log = Some(PathBuf::from("run.csv"));
        args.delimiter = Some('\t');
        args.quota_timeout = Some(600);

        let settings = effective_settings(&args, TransferSettings::default());

        assert_eq!(settings.batch_size, 42);
        assert_eq!(settings.wait_time_secs, 10);
        assert!(!settings.check_target_empty);
        assert!(!settings.confirm);
        assert_eq!(settings.audit_log, Some(PathBuf::from("run.csv")));
        assert_eq!(settings.delimiter, '\t');
        assert_eq!(settings.quota_timeout_secs, Some(600));
    }

    #[test]
    fn test_audit_summary() {
        let written = TransferReport {
            items_moved: 3,
            audit_location: Some("moves.csv".to_string()),
            ..TransferReport::default()
        };
        assert_eq!(
            audit_summary(&written, true).as_deref(),
            Some("Audit log written to moves.csv")
        );

        let empty = TransferReport::default();
        assert_eq!(
            audit_summary(&empty, true).as_deref(),
            Some("No audit log created; nothing was moved.")
        );
        assert_eq!(audit_summary(&empty, false), None);
    }
}
