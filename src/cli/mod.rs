//! CLI front-end: command parsing, registry, and dispatch helpers used by the
//! `chic-resolve` binary.

mod commands;
mod help;

use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use crate::diagnostics::ErrorFormat;
use crate::logging::LogOptions;
use commands::common::is_help_flag;

pub mod dispatch;

pub(crate) type CommandParser = fn(Vec<String>) -> Result<Cli, CliError>;

#[derive(Clone, Copy)]
pub(crate) struct CommandDescriptor {
    name: &'static str,
    aliases: &'static [&'static str],
    parser: CommandParser,
}

impl CommandDescriptor {
    pub(crate) fn parse(&self, args: Vec<String>) -> Result<Cli, CliError> {
        (self.parser)(args)
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| *alias == name)
    }
}

pub(crate) fn resolve_command(name: &str) -> Option<&'static CommandDescriptor> {
    commands::descriptors()
        .iter()
        .find(|descriptor| descriptor.matches(name))
}

/// Top-level commands supported by the `chic-resolve` CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check {
        input: PathBuf,
        /// Print every navigation chain with its inferred type and lowered form.
        emit_lowered: bool,
        /// Resolve declarations on the calling thread only.
        sequential: bool,
        trace_pipeline: bool,
    },
    Help {
        topic: Option<String>,
    },
    Version,
}

/// Parsed CLI invocation.
#[derive(Debug, Clone)]
pub struct Cli {
    pub command: Command,
    pub log_options: LogOptions,
    pub error_format: Option<ErrorFormat>,
}

impl Cli {
    fn help(topic: Option<String>) -> Self {
        Cli {
            command: Command::Help { topic },
            log_options: LogOptions::from_env(),
            error_format: None,
        }
    }
}

/// Error emitted while parsing command-line arguments.
#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_usage(message: impl Into<String>) -> Self {
        let mut owned = message.into();
        owned.push_str("\n\n");
        owned.push_str(&Cli::usage());
        Self::new(owned)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CliError {}

impl Cli {
    /// Parse arguments from the environment.
    ///
    /// # Errors
    /// Returns a [`CliError`] when the arguments cannot be interpreted as a supported command.
    pub fn parse() -> Result<Self, CliError> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments from an iterator (useful for testing).
    ///
    /// # Errors
    /// Returns a [`CliError`] when the provided iterator does not describe a valid invocation.
    pub fn parse_from<I, T>(args: I) -> Result<Self, CliError>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.map(Into::into).collect();
        let mut iter = args.into_iter();
        let Some(raw_command) = iter.next() else {
            return Err(CliError::with_usage("missing command"));
        };

        match raw_command.as_str() {
            "--help" | "-h" | "help" => {
                let topic = iter
                    .next()
                    .filter(|value| !is_help_flag(value))
                    .map(|value| value.to_ascii_lowercase());
                return Ok(Cli::help(topic));
            }
            "--version" | "-V" | "version" => {
                let remaining: Vec<String> = iter.collect();
                if remaining.iter().any(|value| is_help_flag(value)) {
                    return Ok(Cli::help(Some("version".into())));
                }
                if let Some(extra) = remaining.first() {
                    return Err(CliError::with_usage(format!(
                        "unsupported option '{extra}' for command"
                    )));
                }
                return Ok(Cli {
                    command: Command::Version,
                    log_options: LogOptions::from_env(),
                    error_format: None,
                });
            }
            _ => {}
        }

        if let Some(descriptor) = resolve_command(&raw_command) {
            return descriptor.parse(iter.collect());
        }
        Err(CliError::with_usage(format!(
            "unknown command '{raw_command}'"
        )))
    }

    /// Return formatted general help text.
    #[must_use]
    pub fn usage() -> String {
        help::render_general_help()
    }

    /// Return help text for a specific command.
    ///
    /// # Errors
    /// Returns a [`CliError`] when the requested topic is unknown.
    pub fn help_for(topic: &str) -> Result<String, CliError> {
        help::render_command_help(topic)
            .ok_or_else(|| CliError::with_usage(help::format_unknown_topic(topic)))
    }
}
