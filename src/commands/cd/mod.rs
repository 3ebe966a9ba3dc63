// src/commands/cd/mod.rs
use crate::commands::{Command, CommandContext, CommandResult};

pub struct CdCommand;

impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let vfs = match ctx.require_vfs("cd") {
            Ok(vfs) => vfs,
            Err(result) => return result,
        };

        let target = match ctx.args.as_slice() {
            [] => vfs.root(),
            [path] => match vfs.resolve_directory(path, *ctx.cwd) {
                Ok(dir) => dir.id(),
                Err(e) => return CommandResult::error(format!("cd: {}\n", e)),
            },
            _ => return CommandResult::error("cd: too many arguments\n".to_string()),
        };

        *ctx.cwd = target;
        CommandResult::success(String::new())
    }
}
