//! Validation command handler

use super::read_document;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde::Serialize;
use stac_ml_aoi::{
    create_ml_aoi_validator, MlAoiValidator, ValidationConfig, ValidationContext, ValidationError, ValidationErrors,
    ValidationMode,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Outcome of validating one file
#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "ValidationErrors::is_empty")]
    errors: ValidationErrors,
}

/// Machine-readable result of the validate command
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    mode: ValidationMode,
    total: usize,
    failed: usize,
    files: &'a [FileReport],
}

/// Handle the validate command
#[instrument(skip(args, config, output), fields(files = args.files.len()))]
pub async fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("{} file(s)", args.files.len()));
    let settings = effective_settings(&args, &config.validation);
    let validator = create_ml_aoi_validator()?;
    let context = ValidationContext::new(settings.mode);
    info!(mode = %settings.mode, fail_fast = settings.fail_fast, "Starting validation");

    let progress = if args.files.len() > 1 {
        output.progress_bar(args.files.len() as u64, "Validating")
    } else {
        None
    };

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if let Some(pb) = &progress {
            pb.set_message(path.display().to_string());
        }

        let errors = validate_file(&validator, path, &context, config, settings.max_errors).await;
        let valid = errors.is_empty();
        reports.push(FileReport {
            path: path.clone(),
            valid,
            errors,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
        if !valid && settings.fail_fast {
            warn!(path = %path.display(), "Stopping at the first invalid document");
            break;
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let total = args.files.len();
    let failed = reports.iter().filter(|report| !report.valid).count();

    if output.is_human() {
        for report in &reports {
            report_human(output, report, args.detailed)?;
        }
        if reports.len() < total {
            output.warning(&format!("Skipped {} file(s) after the first failure", total - reports.len()))?;
        }
        if failed == 0 {
            output.success(&format!("✓ {} document(s) valid ({} mode)", total, settings.mode))?;
        }
    } else {
        output.data(&ValidationReport {
            mode: settings.mode,
            total,
            failed,
            files: &reports,
        })?;
    }

    if failed > 0 {
        Err(Error::ValidationFailed { failed, total })
    } else {
        Ok(())
    }
}

/// Command-line flags override the configured defaults
fn effective_settings(args: &ValidateArgs, defaults: &ValidationConfig) -> ValidationConfig {
    let mut settings = defaults.clone();
    if let Some(mode) = args.mode {
        settings.mode = mode.into();
    }
    settings.fail_fast |= args.fail_fast;
    settings
}

/// Validate one file; unreadable files are reported as a document error
async fn validate_file(
    validator: &MlAoiValidator,
    path: &Path,
    context: &ValidationContext,
    config: &Config,
    max_errors: usize,
) -> ValidationErrors {
    let _timer = Timer::with_details("validate_file", &path.display().to_string());

    let document = match read_document(path, config).await {
        Ok(document) => document,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Unable to read document");
            return ValidationError::new("$", e.to_string()).into();
        }
    };

    let mut errors = validator.collect_errors_with_context(&document, context);
    if max_errors > 0 {
        errors.errors.truncate(max_errors);
    }
    errors
}

fn report_human(output: &mut OutputWriter, report: &FileReport, detailed: bool) -> Result<()> {
    if report.valid {
        return output.success(&format!("✓ {} is valid", report.path.display()));
    }

    output.error(&format!(
        "✗ {} failed validation ({} error(s))",
        report.path.display(),
        report.errors.len()
    ))?;

    if detailed {
        output.validation_errors(&report.errors)
    } else {
        for error in report.errors.iter() {
            output.error(&format!("  {}: {}", error.path, error.message))?;
        }
        Ok(())
    }
}
