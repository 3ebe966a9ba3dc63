//! Shell Environment
//!
//! Interactive session over a mounted VFS: prompt, dispatch, script
//! playback and the startup banner.

pub mod banner;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

pub use banner::{banner_text, TypingWriter};
pub use session::Shell;

/// Options for creating a shell session.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// Name shown before `@` in the prompt
    pub username: String,
    /// Operating system name used in the prompt and banner
    pub system_name: String,
    pub version_major: u32,
    pub version_minor: u32,
    /// Architecture shown in the banner
    pub system_type: String,
    /// Pause between characters of typewriter output
    pub typing_delay: Duration,
    /// Echo the startup configuration after the banner
    pub debug: bool,
    /// Declaration file the VFS was loaded from
    pub vfs_path: Option<PathBuf>,
    /// Script played back before the interactive loop
    pub script_path: Option<PathBuf>,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            username: "user".to_string(),
            system_name: "DDTRon".to_string(),
            version_major: 1,
            version_minor: 0,
            system_type: "x86_64".to_string(),
            typing_delay: Duration::ZERO,
            debug: false,
            vfs_path: None,
            script_path: None,
        }
    }
}
