use crate::commands::{Command, CommandContext, CommandResult};

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(&self, _ctx: CommandContext<'_>) -> CommandResult {
        CommandResult::terminate("Shutting down\n".to_string())
    }
}
