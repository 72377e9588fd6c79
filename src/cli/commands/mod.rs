pub(crate) mod common;

mod check;

use super::CommandDescriptor;
use check::parse as parse_check_command;

const COMMANDS: &[CommandDescriptor] = &[CommandDescriptor {
    name: "check",
    aliases: &["resolve"],
    parser: parse_check_command,
}];

pub(crate) fn descriptors() -> &'static [CommandDescriptor] {
    COMMANDS
}
