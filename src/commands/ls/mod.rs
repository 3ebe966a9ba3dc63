// src/commands/ls/mod.rs
use crate::commands::{Command, CommandContext, CommandResult};
use crate::fs::{NodeRef, Vfs};

pub struct LsCommand;

/// Directories first (suffixed with `/`), then files, each group in
/// declaration order. A file lists as its own name.
fn format_listing(target: NodeRef<'_>, vfs: &Vfs) -> String {
    if target.is_file() {
        return format!("{}\n", target.name());
    }
    let mut out = String::new();
    for dir in vfs.list_directories(target.id()) {
        out.push_str(dir.name());
        out.push_str("/\n");
    }
    for file in vfs.list_files(target.id()) {
        out.push_str(file.name());
        out.push('\n');
    }
    out
}

impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let vfs = match ctx.require_vfs("ls") {
            Ok(vfs) => vfs,
            Err(result) => return result,
        };

        if ctx.args.is_empty() {
            let here = vfs.node_ref(*ctx.cwd);
            return CommandResult::success(format_listing(here, vfs));
        }

        let show_headers = ctx.args.len() > 1;
        let mut stdout = String::new();
        let mut stderr = String::new();
        let mut exit_code = 0;

        for (i, path) in ctx.args.iter().enumerate() {
            match vfs.resolve(path, *ctx.cwd) {
                Ok(target) => {
                    if show_headers {
                        if i > 0 && !stdout.is_empty() {
                            stdout.push('\n');
                        }
                        stdout.push_str(&format!("{}:\n", path));
                    }
                    stdout.push_str(&format_listing(target, vfs));
                }
                Err(e) => {
                    stderr.push_str(&format!("ls: {}\n", e));
                    exit_code = 1;
                }
            }
        }

        CommandResult::with_exit_code(stdout, stderr, exit_code)
    }
}
