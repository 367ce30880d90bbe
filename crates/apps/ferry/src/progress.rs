//! Terminal progress bars for transfers

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mail::batch::Batch;
use mail::{ItemProgress, MailItem, ProgressObserver};

const BATCH_TEMPLATE: &str = "   {prefix:.bold} {wide_msg:.dim}\n   {wide_bar:.cyan/blue} {pos}/{len} ({percent}%)";
const DONE_TEMPLATE: &str = "   {prefix:.bold} {wide_msg}\n   {wide_bar:.green} {pos}/{len} ({percent}%)";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// One progress bar per batch
#[derive(Default)]
pub struct IndicatifProgress {
    bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn println(&self, message: String) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => eprintln!("{}", message),
        }
    }
}

impl ProgressObserver for IndicatifProgress {
    fn batch_started(&mut self, batch_index: usize, batch_count: usize, batch: &Batch<'_>) {
        let bar = ProgressBar::new(batch.len() as u64)
            .with_style(style(BATCH_TEMPLATE))
            .with_prefix(format!("Batch {}/{}", batch_index, batch_count))
            .with_message(format!("{:.2} MB", batch.total_size() as f64 / (1024.0 * 1024.0)));
        bar.tick();
        self.bar = Some(bar);
    }

    fn item_moved(&mut self, progress: &ItemProgress<'_>) {
        if let Some(bar) = &self.bar {
            bar.set_position(progress.item_index as u64);
            bar.set_message(progress.item.subject.clone());
        }
    }

    fn throttled(&mut self, item: &MailItem, attempt: u32, wait: Duration) {
        self.println(format!(
            "   Throttled moving {} (attempt {}), retrying in {:.1}s",
            item.id,
            attempt,
            wait.as_secs_f64()
        ));
    }

    fn waiting_for_target(&mut self, remaining: u64, wait: Duration) {
        self.println(format!(
            "   Target folder still holds {} items, checking again in {}s",
            remaining,
            wait.as_secs()
        ));
    }

    fn batch_finished(&mut self, _batch_index: usize, _batch_count: usize) {
        if let Some(bar) = self.bar.take() {
            bar.set_style(style(DONE_TEMPLATE));
            bar.finish_with_message("done");
        }
    }
}
