//! Terminal output for the CLI.
//!
//! Human output is suppressed in `--json` mode, where commands print a single
//! JSON document on stdout and errors as JSON on stderr.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use seating_core::submission::SubmissionState;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn line(&self, stream: Stream, marker: StyledObject<&str>, msg: impl std::fmt::Display) {
        if self.json {
            return;
        }
        match stream {
            Stream::Stdout => println!("{} {}", marker, msg),
            Stream::Stderr => eprintln!("{} {}", marker, msg),
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Stream::Stdout, style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Stream::Stdout, style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Stream::Stderr, style("⚠").yellow(), msg);
    }

    /// Errors are printed in both modes.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            self.line(Stream::Stderr, style("✗").red(), style(msg).red());
        }
    }

    /// Only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(Stream::Stderr, style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Option line; the selected one is marked and bold.
    pub fn list_item(&self, item: &str, selected: bool) {
        if self.json {
            return;
        }
        if selected {
            println!("  {} {}", style("●").green(), style(item).bold());
        } else {
            println!("  {} {}", style("○").dim(), item);
        }
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let row: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:width$}", col, width = *width))
            .collect();
        println!("  {}", row.join("  ").trim_end());
    }

    /// Spinner on stderr; hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored label for a submission state.
pub fn status_badge(state: &SubmissionState) -> String {
    let label = state.as_str();
    match state {
        SubmissionState::Succeeded => style(label).green().to_string(),
        SubmissionState::Submitting => style(label).yellow().to_string(),
        SubmissionState::Failed { .. } => style(label).red().to_string(),
        SubmissionState::Ready => style(label).dim().to_string(),
    }
}
