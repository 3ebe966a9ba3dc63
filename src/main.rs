use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use vfs_shell::shell::{banner_text, TypingWriter};
use vfs_shell::{load_file, Shell, ShellOptions, Vfs};

const TYPING_DELAY: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "vfs-shell")]
#[command(about = "A minimal shell over a declarative virtual file system")]
#[command(version)]
struct Cli {
    /// VFS declaration file to mount
    #[arg(long = "vfs")]
    vfs: Option<PathBuf>,

    /// Script to play back before the interactive prompt
    #[arg(long = "script")]
    script: Option<PathBuf>,

    /// Do not echo the startup configuration
    #[arg(long = "no-debug")]
    no_debug: bool,

    /// Print the banner instantly instead of typing it out
    #[arg(long = "no-typing")]
    no_typing: bool,

    /// Skip the startup banner
    #[arg(long = "no-banner")]
    no_banner: bool,

    /// Diagnostics written to stderr
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.log_level);
    debug!("Parsed CLI arguments: {cli:?}");

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_tracing(level: LogLevel) {
    if let Some(level) = level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

/// Load the declaration at `path`. A failure comes back as the single
/// line reported to the user.
fn mount(path: Option<&Path>) -> Result<Option<Vfs>, String> {
    let Some(path) = path else {
        warn!("No VFS declaration given, navigation commands are disabled");
        return Ok(None);
    };
    load_file(path)
        .map(Some)
        .map_err(|e| format!("Error: Failed to load VFS from {}: {}", path.display(), e))
}

fn run(cli: Cli) -> io::Result<()> {
    let options = ShellOptions {
        typing_delay: if cli.no_typing { Duration::ZERO } else { TYPING_DELAY },
        debug: !cli.no_debug,
        vfs_path: cli.vfs.clone(),
        script_path: cli.script.clone(),
        ..Default::default()
    };

    let vfs = match mount(cli.vfs.as_deref()) {
        Ok(vfs) => vfs,
        Err(message) => {
            eprintln!("{}", message);
            None
        }
    };

    let mut shell = Shell::new(vfs, options);
    let mut out = io::stdout();
    let mut err = io::stderr();

    if !cli.no_banner {
        let mut writer = TypingWriter::new(out.lock(), shell.options().typing_delay);
        writer.type_text(&banner_text(shell.options()))?;
    }
    if let Some(report) = shell.debug_report() {
        print!("{}", report);
    }

    if let Some(path) = &cli.script {
        match File::open(path) {
            Ok(file) => {
                if shell.run_script(BufReader::new(file), &mut out, &mut err)? {
                    return Ok(());
                }
            }
            Err(e) => eprintln!("Error: Cannot read script file: {}: {}", path.display(), e),
        }
    }

    shell.run_interactive(io::stdin().lock(), &mut out, &mut err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mount_without_declaration() {
        assert!(mount(None).unwrap().is_none());
    }

    #[test]
    fn test_mount_failure_is_one_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<vfs><dir name=\"root\"></dir></vfs>").unwrap();
        let message = mount(Some(file.path())).unwrap_err();
        assert!(message.starts_with("Error: Failed to load VFS from "));
        assert!(message.ends_with(": VFS root directory is empty"));
        assert_eq!(message.lines().count(), 1);
    }

    #[test]
    fn test_mount_success() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<vfs><dir name=\"root\"><dir name=\"etc\"/></dir></vfs>").unwrap();
        let vfs = mount(Some(file.path())).unwrap().unwrap();
        assert_eq!(vfs.len(), 2);
    }
}
