//! Terminal rendering of the batch event stream — progress bar and colored
//! status log, via `indicatif` and `console`.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::batch::BatchSummary;
use crate::status::{BatchEvent, Severity, StatusEvent, percent};

/// Renders batch events as they arrive: a 0-100 progress bar fed by progress
/// updates, status lines printed above it with severity coloring.
pub struct BatchDisplay {
    bar: ProgressBar,
    cyan: Style,
    green: Style,
    yellow: Style,
    red: Style,
}

impl BatchDisplay {
    pub fn start() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {pos:>3}%")
                .expect("invalid template"),
        );
        Self {
            bar,
            cyan: Style::new().cyan(),
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            red: Style::new().red().bold(),
        }
    }

    pub fn handle(&self, event: &BatchEvent) {
        match event {
            BatchEvent::Progress { current, total } => {
                self.bar.set_position(percent(*current, *total));
            }
            BatchEvent::Status(status) => self.print_status(status),
        }
    }

    fn print_status(&self, status: &StatusEvent) {
        let line = match status.severity {
            Severity::Info => self.cyan.apply_to(&status.message).to_string(),
            Severity::Success => format!("{} {}", self.green.apply_to("✓"), status.message),
            Severity::Warning => format!("{} {}", self.yellow.apply_to("!"), status.message),
            Severity::Error => format!("{} {}", self.red.apply_to("✗"), status.message),
        };
        self.bar.println(line);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Print the summary record formatted as JSON with a styled header.
    pub fn print_summary(&self, summary: &BatchSummary) {
        let style = if summary.fatal.is_some() || summary.succeeded < summary.total {
            &self.red
        } else {
            &self.green
        };
        println!();
        println!("{}", style.apply_to("─── Batch Summary ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_default()
        );
    }
}

/// Drain the event channel until the worker drops its sink.
pub async fn drain(mut rx: UnboundedReceiver<BatchEvent>, display: &BatchDisplay) {
    while let Some(event) = rx.recv().await {
        display.handle(&event);
    }
}
