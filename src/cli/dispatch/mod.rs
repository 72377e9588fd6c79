use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::commands::common::parse_error_format;
use crate::cli::{Cli, CliError, Command};
use crate::diagnostics::{ErrorFormat, FormatOptions};
use crate::driver::{CheckOptions, CheckReport, CompilerDriver, resolve_trace_enabled};
use crate::error::{Error, Result};
use crate::logging::LogLevel;

mod logging;
mod reporting;
#[cfg(test)]
mod tests;

/// What the dispatcher needs from a driver; tests substitute their own.
pub trait DispatchDriver {
    fn check(&self, input: &Path, options: &CheckOptions) -> Result<CheckReport>;
}

impl DispatchDriver for CompilerDriver {
    fn check(&self, input: &Path, options: &CheckOptions) -> Result<CheckReport> {
        self.check_file(input, options)
    }
}

/// Execute a parsed CLI command using the provided driver. Logging and diagnostics
/// reporting are configured here so the binary entrypoint can stay thin.
pub fn run<D: DispatchDriver>(driver: &D, cli: Cli) -> Result<()> {
    let log_options = cli.log_options.resolved();
    let trace_requested = logging::command_requests_trace(&cli.command);
    let effective_level = logging::resolve_effective_level(&log_options, trace_requested);
    logging::init_logging(log_options, effective_level);

    let env_error_format = std::env::var("CHIC_ERROR_FORMAT")
        .ok()
        .and_then(|value| parse_error_format(&value).ok());
    let default_format = env_error_format.unwrap_or_else(|| {
        if io::stderr().is_terminal() {
            ErrorFormat::Human
        } else {
            ErrorFormat::Short
        }
    });
    let format_options = FormatOptions::new(cli.error_format.unwrap_or(default_format));

    let start = Instant::now();
    logging::log_run_start(&cli.command, &log_options, trace_requested);
    let mut stdout = io::stdout();
    let result = dispatch_command(
        driver,
        cli.command.clone(),
        effective_level,
        format_options,
        &mut stdout,
    );
    logging::log_run_complete(&cli.command, start.elapsed(), &result);
    result
}

pub fn report_error(err: &Error) {
    reporting::report_error(err);
}

pub(crate) fn dispatch_command<D: DispatchDriver>(
    driver: &D,
    command: Command,
    effective_level: LogLevel,
    format_options: FormatOptions,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Check {
            input,
            emit_lowered,
            sequential,
            trace_pipeline,
        } => {
            let options = CheckOptions {
                parallel: !sequential,
                trace_pipeline: resolve_trace_enabled(trace_pipeline, effective_level),
            };
            let report = driver.check(&input, &options)?;
            run_check(&report, emit_lowered, format_options, out)
        }
        Command::Help { topic } => {
            let text = match topic {
                Some(topic) => Cli::help_for(&topic)?,
                None => Cli::usage(),
            };
            write!(out, "{text}")?;
            Ok(())
        }
        Command::Version => {
            writeln!(out, "chic-resolve {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
    }
}

fn run_check(
    report: &CheckReport,
    emit_lowered: bool,
    format_options: FormatOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let json = format_options.format == ErrorFormat::Json;
    if emit_lowered {
        reporting::print_navigation_to(report, json, out)?;
    }
    reporting::print_report_diagnostics_to(report, format_options, out)?;
    if report.has_errors() {
        return Err(Error::Cli(CliError::new(format!(
            "{} error(s) reported for {}; see diagnostics above",
            report.error_count(),
            report.input.display()
        ))));
    }
    if !json {
        writeln!(
            out,
            "check passed for {} ({} declaration(s), {} null-conditional chain(s))",
            report.input.display(),
            report.declarations.len(),
            report.navigation.len()
        )?;
    }
    Ok(())
}
