use std::time::Duration;

use crate::cli::Command;
use crate::logging::{LogLevel, LogOptions};

pub(super) fn resolve_effective_level(options: &LogOptions, trace_requested: bool) -> LogLevel {
    let base = options.level;
    if trace_requested && base < LogLevel::Info {
        LogLevel::Info
    } else {
        base
    }
}

pub(super) fn command_requests_trace(command: &Command) -> bool {
    matches!(command, Command::Check { trace_pipeline, .. } if *trace_pipeline)
}

pub(super) fn init_logging(options: LogOptions, enforced_level: LogLevel) {
    crate::logging::init_logging(LogOptions {
        level: enforced_level,
        ..options
    });
}

pub(super) fn log_run_start(command: &Command, options: &LogOptions, trace_requested: bool) {
    tracing::info!(
        target: "pipeline",
        stage = "cli.run.start",
        command = command_name(command),
        status = "start",
        input = %command_input(command),
        log_level = %options.level,
        log_format = %options.format,
        trace_pipeline = trace_requested
    );
}

pub(super) fn log_run_complete(
    command: &Command,
    elapsed: Duration,
    result: &crate::error::Result<()>,
) {
    let elapsed_ms = elapsed.as_millis() as u64;
    match result {
        Ok(()) => tracing::info!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "ok",
            input = %command_input(command),
            elapsed_ms
        ),
        Err(err) => tracing::error!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "error",
            input = %command_input(command),
            elapsed_ms,
            error = %err
        ),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Check { .. } => "check",
        Command::Help { .. } => "help",
        Command::Version => "version",
    }
}

fn command_input(command: &Command) -> String {
    match command {
        Command::Check { input, .. } => input.display().to_string(),
        Command::Help { .. } | Command::Version => "<none>".into(),
    }
}
