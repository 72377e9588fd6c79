use super::super::{Cli, CliError, Command};
use super::common::{is_help_flag, parse_check_flags, require_input};

pub(super) fn parse(args: Vec<String>) -> Result<Cli, CliError> {
    if args.iter().any(|value| is_help_flag(value)) {
        return Ok(Cli::help(Some("check".into())));
    }
    let mut args = args.into_iter();
    let input = require_input(args.next(), "check requires <file> argument")?;
    let flags = parse_check_flags(args)?;
    Ok(Cli {
        command: Command::Check {
            input,
            emit_lowered: flags.emit_lowered,
            sequential: flags.sequential,
            trace_pipeline: flags.trace_pipeline,
        },
        log_options: flags.log_settings.merged_with_env(),
        error_format: flags.error_format,
    })
}
