//! Writing command results to stdout
//!
//! Documents and reports are serialized in the `--output` format. Human
//! mode adds status lines, tables and a readable rendering of validation
//! errors; the other formats only ever print data.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use stac_ml_aoi::{ValidationError, ValidationErrors};
use std::io::{self, IsTerminal, Write};
use tracing::{debug, trace};

/// Serialization of command results in one output format
pub trait OutputFormatter {
    /// Serialize any result value
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Render a validation report
    fn render_errors(&self, errors: &ValidationErrors) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::JsonPretty | OutputFormat::Human => serde_json::to_string_pretty(value)?,
        })
    }

    fn render_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(human_errors(errors)),
            _ => self.serialize(errors),
        }
    }
}

/// Kind of a human status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Info,
    Success,
    Warning,
    Error,
}

impl Status {
    fn plain(self, message: &str) -> String {
        match self {
            Status::Info => format!("INFO: {}", message),
            Status::Success => message.to_string(),
            Status::Warning => format!("WARNING: {}", message),
            Status::Error => format!("ERROR: {}", message),
        }
    }

    fn colored(self, message: &str) -> String {
        match self {
            Status::Info => format!("{} {}", "ℹ".blue(), message),
            Status::Success => message.green().to_string(),
            Status::Warning => message.yellow().to_string(),
            Status::Error => message.red().to_string(),
        }
    }

    /// Warnings and errors survive `--quiet`
    fn always_shown(self) -> bool {
        matches!(self, Status::Warning | Status::Error)
    }
}

/// Writer for command results
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    progress: bool,
    out: Box<dyn Write>,
}

impl OutputWriter {
    /// Writer on stdout; progress bars need an interactive stderr
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            quiet,
            progress: progress && !quiet && io::stderr().is_terminal(),
            out: Box::new(io::stdout()),
        }
    }

    /// Uncolored writer on any sink, without progress bars
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, quiet: bool, out: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color: false,
            quiet,
            progress: false,
            out,
        }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write text as is
    pub fn write(&mut self, content: &str) -> Result<()> {
        self.out.write_all(content.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Write text followed by a newline
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.out, "{}", content)?;
        self.out.flush()?;
        Ok(())
    }

    /// Write a block, adding the final newline only when missing
    fn block(&mut self, content: &str) -> Result<()> {
        if content.ends_with('\n') {
            self.write(content)
        } else {
            self.writeln(content)
        }
    }

    fn status(&mut self, status: Status, message: &str) -> Result<()> {
        if !self.is_human() || (self.quiet && !status.always_shown()) {
            return Ok(());
        }

        let line = if self.use_color {
            status.colored(message)
        } else {
            status.plain(message)
        };
        self.writeln(&line)
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!(text = message, "Output info");
        self.status(Status::Info, message)
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        self.status(Status::Success, message)
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        self.status(Status::Warning, message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.status(Status::Error, message)
    }

    /// Heading preceded by a blank line
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        let heading = if self.use_color {
            format!("── {} ──", title).bold().bright_blue().to_string()
        } else {
            format!("== {} ==", title)
        };
        self.writeln("")?;
        self.writeln(&heading)
    }

    /// Serialize a result in the configured format
    ///
    /// Hrefs may carry signed URLs, so the trace copy is redacted.
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(data = %redacted(value), "Writing data");
        }

        let text = self.format.serialize(value)?;
        self.block(&text)
    }

    /// Write a validation report in the configured format
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let text = self.format.render_errors(errors)?;
        self.block(&text)
    }

    /// Progress bar on stderr, when enabled for this session
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        self.progress.then(|| {
            ProgressBar::new(length)
                .with_style(progress_style())
                .with_message(message.to_string())
        })
    }

    /// Aligned table, human format only
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        let mut lines = layout_table(headers, &rows).into_iter();
        if let Some(header) = lines.next() {
            let header = if self.use_color { header.bold().to_string() } else { header };
            self.writeln(&header)?;
        }
        for line in lines {
            self.writeln(&line)?;
        }
        Ok(())
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {pos}/{len} [{bar:30.cyan/blue}] {wide_msg}")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn redacted<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(mut json) => {
            redaction::redact_json_value(&mut json);
            json.to_string()
        }
        Err(_) => "<unserializable>".to_string(),
    }
}

/// Header, separator and rows, padded to the widest cell of each column
fn layout_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.to_vec()));
    lines.push(widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─"));
    lines.extend(rows.iter().map(|row| line(row.iter().map(String::as_str).collect())));
    lines
}

/// Numbered report, one block per error
fn human_errors(errors: &ValidationErrors) -> String {
    let mut report = format!("✗ {} validation error(s)\n", errors.len());
    for (i, error) in errors.iter().enumerate() {
        report.push('\n');
        report.push_str(&human_error(i + 1, error));
    }
    report
}

fn human_error(number: usize, error: &ValidationError) -> String {
    let mut block = format!("{:>3}. {}\n     {}\n", number, error.path, error.message);
    for violation in &error.schema_violations {
        block.push_str(&format!(
            "     ↳ {}: expected {}, found {}\n",
            violation.rule, violation.expected, violation.actual
        ));
    }
    block
}
