use std::path::PathBuf;

use crate::diagnostics::ErrorFormat;
use crate::logging::{LogFormat, LogLevel, LogSettings};

use super::super::CliError;

pub(crate) fn is_help_flag(value: &str) -> bool {
    matches!(value, "-h" | "--help")
}

pub(crate) fn require_input(
    value: Option<String>,
    missing_message: &str,
) -> Result<PathBuf, CliError> {
    let Some(raw) = value else {
        return Err(CliError::with_usage(missing_message));
    };
    if raw.starts_with('-') {
        return Err(CliError::with_usage(missing_message));
    }
    if raw.trim().is_empty() {
        return Err(CliError::with_usage("input path must not be empty"));
    }
    Ok(PathBuf::from(raw))
}

/// Flags accepted after `check <file>`.
#[derive(Debug, Default)]
pub(crate) struct CheckFlags {
    pub(crate) emit_lowered: bool,
    pub(crate) sequential: bool,
    pub(crate) trace_pipeline: bool,
    pub(crate) log_settings: LogSettings,
    pub(crate) error_format: Option<ErrorFormat>,
}

pub(crate) fn parse_check_flags(
    args: impl Iterator<Item = String>,
) -> Result<CheckFlags, CliError> {
    let iter: Vec<String> = args.collect();
    let mut idx = 0;
    let mut flags = CheckFlags::default();

    while idx < iter.len() {
        let flag = &iter[idx];
        idx += 1;
        match flag.as_str() {
            "--emit-lowered" => flags.emit_lowered = true,
            "--sequential" => flags.sequential = true,
            "--trace-pipeline" => flags.trace_pipeline = true,
            "--log-format" => {
                let Some(value) = iter.get(idx) else {
                    return Err(CliError::with_usage("expected value after --log-format"));
                };
                idx += 1;
                let Some(format) = LogFormat::parse(value) else {
                    return Err(CliError::with_usage(format!(
                        "invalid log format '{value}'; supported values: auto, text, json"
                    )));
                };
                flags.log_settings.format = Some(format);
            }
            "--log-level" => {
                let Some(value) = iter.get(idx) else {
                    return Err(CliError::with_usage("expected value after --log-level"));
                };
                idx += 1;
                let Some(level) = LogLevel::parse(value) else {
                    return Err(CliError::with_usage(format!(
                        "invalid log level '{value}'; \
                         supported values: error, warn, info, debug, trace"
                    )));
                };
                flags.log_settings.level = Some(level);
            }
            "--error-format" => {
                let Some(value) = iter.get(idx) else {
                    return Err(CliError::with_usage("expected value after --error-format"));
                };
                idx += 1;
                flags.error_format = Some(parse_error_format(value)?);
            }
            other => {
                return Err(CliError::with_usage(format!(
                    "unsupported option '{other}' for command"
                )));
            }
        }
    }
    Ok(flags)
}

pub(crate) fn parse_error_format(value: &str) -> Result<ErrorFormat, CliError> {
    ErrorFormat::parse(value).ok_or_else(|| {
        CliError::with_usage(format!(
            "invalid error format '{value}'; supported values: human, short, json"
        ))
    })
}
