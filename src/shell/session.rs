//! Shell Session
//!
//! Holds the navigation state (current directory) over an optional mounted
//! VFS and dispatches tokenized command lines to the built-in commands.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use tracing::debug;

use super::ShellOptions;
use crate::commands::{create_builtin_registry, CommandContext, CommandRegistry, CommandResult};
use crate::fs::{NodeId, Vfs};
use crate::fs::tree::ROOT_ID;
use crate::parser::tokenize;

/// Exit code for a command name that is not registered.
pub const UNKNOWN_COMMAND_EXIT_CODE: i32 = 127;

/// One interactive session.
pub struct Shell {
    vfs: Option<Vfs>,
    cwd: NodeId,
    registry: CommandRegistry,
    options: ShellOptions,
    started: Instant,
}

impl Shell {
    /// Start a session at the root of `vfs`. Without a VFS, navigation
    /// commands report an error.
    pub fn new(vfs: Option<Vfs>, options: ShellOptions) -> Self {
        let cwd = vfs.as_ref().map_or(ROOT_ID, Vfs::root);
        Self {
            vfs,
            cwd,
            registry: create_builtin_registry(),
            options,
            started: Instant::now(),
        }
    }

    pub fn vfs(&self) -> Option<&Vfs> {
        self.vfs.as_ref()
    }

    pub fn options(&self) -> &ShellOptions {
        &self.options
    }

    /// Current directory, always a directory of the mounted VFS.
    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    /// Rendered path of the current directory, `root` when nothing is mounted.
    pub fn current_path(&self) -> String {
        match &self.vfs {
            Some(vfs) => vfs.absolute_path(self.cwd),
            None => "root".to_string(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "{}@{} OS [{}] ~ ",
            self.options.username,
            self.options.system_name,
            self.current_path()
        )
    }

    /// Startup configuration echo shown in debug mode.
    pub fn debug_report(&self) -> Option<String> {
        if !self.options.debug {
            return None;
        }
        let show = |p: &Option<std::path::PathBuf>| {
            p.as_ref().map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        };
        Some(format!(
            "[debug] VFS source: {}\n[debug] Start script: {}\n",
            show(&self.options.vfs_path),
            show(&self.options.script_path)
        ))
    }

    /// Tokenize and run one input line.
    pub fn exec(&mut self, line: &str) -> CommandResult {
        let parsed = match tokenize(line) {
            Ok(parsed) => parsed,
            Err(e) => return CommandResult::error(format!("Error: {}\n", e)),
        };
        let Some(name) = parsed.command else {
            return CommandResult::default();
        };
        let Some(command) = self.registry.get(&name) else {
            return CommandResult::with_exit_code(
                String::new(),
                format!("Error: Unknown command {}\n", name),
                UNKNOWN_COMMAND_EXIT_CODE,
            );
        };

        debug!(command = %name, args = ?parsed.args, "dispatching command");
        command.execute(CommandContext {
            args: parsed.args,
            vfs: self.vfs.as_ref(),
            cwd: &mut self.cwd,
            started: self.started,
        })
    }

    /// Play back a script: each line is echoed after the prompt, then run.
    /// Blank lines and `#` comments are skipped. Returns `true` if the
    /// script ended the session.
    pub fn run_script<R: BufRead>(
        &mut self,
        script: R,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<bool> {
        for line in script.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            writeln!(out, "{}{}", self.prompt(), trimmed)?;
            let result = self.exec(trimmed);
            emit(&result, out, err)?;
            if result.terminate {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Prompt, read and run lines until `exit` or end of input.
    pub fn run_interactive<R: BufRead>(
        &mut self,
        mut input: R,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(out, "{}", self.prompt())?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            let result = self.exec(&line);
            emit(&result, out, err)?;
            if result.terminate {
                return Ok(());
            }
        }
    }
}

fn emit(result: &CommandResult, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    out.write_all(result.stdout.as_bytes())?;
    err.write_all(result.stderr.as_bytes())?;
    out.flush()?;
    err.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::sample_vfs;

    fn shell() -> Shell {
        Shell::new(Some(sample_vfs()), ShellOptions::default())
    }

    #[test]
    fn test_prompt_tracks_cwd() {
        let mut shell = shell();
        assert_eq!(shell.prompt(), "user@DDTRon OS [root] ~ ");
        assert_eq!(shell.exec("cd home/user").exit_code, 0);
        assert_eq!(shell.prompt(), "user@DDTRon OS [root/home/user] ~ ");
    }

    #[test]
    fn test_exec_dispatch_and_errors() {
        let mut shell = shell();
        assert_eq!(shell.exec("   "), CommandResult::default());

        let result = shell.exec("rm -rf /");
        assert_eq!(result.exit_code, UNKNOWN_COMMAND_EXIT_CODE);
        assert_eq!(result.stderr, "Error: Unknown command rm\n");

        let result = shell.exec("cd \"etc");
        assert_eq!(result.stderr, "Error: Unclosed quotes\n");
        assert_eq!(shell.cwd(), shell.vfs().unwrap().root());

        assert_eq!(shell.exec("pwd").stdout, "root\n");
    }

    #[test]
    fn test_failed_cd_keeps_position() {
        let mut shell = shell();
        shell.exec("cd etc");
        let before = shell.cwd();
        assert_eq!(shell.exec("cd motd").exit_code, 1);
        assert_eq!(shell.exec("cd ../nowhere").exit_code, 1);
        assert_eq!(shell.cwd(), before);
    }

    #[test]
    fn test_without_vfs() {
        let mut shell = Shell::new(None, ShellOptions::default());
        assert_eq!(shell.prompt(), "user@DDTRon OS [root] ~ ");
        assert_eq!(shell.exec("cd etc").stderr, "cd: VFS is not loaded\n");
        assert_eq!(shell.exec("ls").stderr, "ls: VFS is not loaded\n");
        assert_eq!(shell.exec("pwd").exit_code, 1);
        assert!(shell.exec("exit").terminate);
    }

    #[test]
    fn test_debug_report() {
        let shell = shell();
        assert_eq!(shell.debug_report(), None);

        let options = ShellOptions {
            debug: true,
            vfs_path: Some("fs.xml".into()),
            ..Default::default()
        };
        let shell = Shell::new(None, options);
        assert_eq!(
            shell.debug_report().unwrap(),
            "[debug] VFS source: fs.xml\n[debug] Start script: (none)\n"
        );
    }

    #[test]
    fn test_run_script_stops_at_exit() {
        let mut shell = shell();
        let script = "# setup\n\ncd etc\nls\nexit\npwd\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let ended = shell.run_script(script.as_bytes(), &mut out, &mut err).unwrap();
        assert!(ended);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "user@DDTRon OS [root] ~ cd etc\n\
             user@DDTRon OS [root/etc] ~ ls\n\
             ssh/\nmotd\n\
             user@DDTRon OS [root/etc] ~ exit\n\
             Shutting down\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_interactive_until_eof() {
        let mut shell = shell();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        shell
            .run_interactive("cd nope\npwd\n".as_bytes(), &mut out, &mut err)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "user@DDTRon OS [root] ~ user@DDTRon OS [root] ~ root\nuser@DDTRon OS [root] ~ \n"
        );
        assert_eq!(String::from_utf8(err).unwrap(), "cd: nope: No such file or directory\n");
    }
}
