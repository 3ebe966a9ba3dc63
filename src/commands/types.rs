// src/commands/types.rs
use std::time::Instant;

use crate::fs::{NodeId, Vfs};

pub const VFS_NOT_LOADED: &str = "VFS is not loaded";

/// Result of running one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// The session must stop reading input after this command.
    pub terminate: bool,
}

impl CommandResult {
    pub fn success(stdout: String) -> Self {
        Self { stdout, ..Default::default() }
    }

    pub fn error(stderr: String) -> Self {
        Self { stderr, exit_code: 1, ..Default::default() }
    }

    pub fn with_exit_code(stdout: String, stderr: String, exit_code: i32) -> Self {
        Self { stdout, stderr, exit_code, terminate: false }
    }

    pub fn terminate(stdout: String) -> Self {
        Self { stdout, terminate: true, ..Default::default() }
    }
}

/// Everything a command may look at or change.
///
/// `cwd` is the session's navigation state; only `cd` writes it, and only
/// after a successful resolution.
pub struct CommandContext<'a> {
    pub args: Vec<String>,
    pub vfs: Option<&'a Vfs>,
    pub cwd: &'a mut NodeId,
    pub started: Instant,
}

impl<'a> CommandContext<'a> {
    /// The mounted VFS, or the error result `command` should return.
    pub fn require_vfs(&self, command: &str) -> Result<&'a Vfs, CommandResult> {
        self.vfs
            .ok_or_else(|| CommandResult::error(format!("{}: {}\n", command, VFS_NOT_LOADED)))
    }
}

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, ctx: CommandContext<'_>) -> CommandResult;
}
