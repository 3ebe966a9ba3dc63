use std::time::Duration;

use chrono::Local;

use crate::commands::{Command, CommandContext, CommandResult};

pub struct UptimeCommand;

/// ` HH:MM:SS up ...` in the style of procps `uptime`, without load averages.
fn format_uptime(now: &str, elapsed: Duration) -> String {
    let total_minutes = elapsed.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut up = String::new();
    if days > 0 {
        up.push_str(&format!("{} day{}, ", days, if days == 1 { "" } else { "s" }));
    }
    if days == 0 && hours == 0 {
        up.push_str(&format!("{} min", minutes));
    } else {
        up.push_str(&format!("{}:{:02}", hours, minutes));
    }
    format!(" {} up {}\n", now, up)
}

impl Command for UptimeCommand {
    fn name(&self) -> &'static str {
        "uptime"
    }

    fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let now = Local::now().format("%H:%M:%S").to_string();
        CommandResult::success(format_uptime(&now, ctx.started.elapsed()))
    }
}
