// src/commands/pwd/mod.rs
use crate::commands::{Command, CommandContext, CommandResult};

pub struct PwdCommand;

impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        // Arguments are ignored, as in bash.
        match ctx.require_vfs("pwd") {
            Ok(vfs) => CommandResult::success(format!("{}\n", vfs.absolute_path(*ctx.cwd))),
            Err(result) => result,
        }
    }
}
