//! Startup banner and typewriter-style output.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use super::ShellOptions;

const LOGO: &str = r"
     ____  ____  _____                _____ _____
    |    \|    \|_   _|___ ___ ___   |     |   __|
    |  |  |  |  | | | |  _| . |   |  |  |  |__   |
    |____/|____/  |_| |_| |___|_|_|  |_____|_____|
";

/// The text printed when a session starts.
pub fn banner_text(options: &ShellOptions) -> String {
    format!(
        "{}\n{} OS v{}.{} ({})\nKernel {}.{}-{} on VM\n\nWelcome to {} OS!\n",
        LOGO,
        options.system_name,
        options.version_major,
        options.version_minor,
        options.system_type,
        options.version_major,
        options.version_minor,
        options.system_name,
        options.system_name,
    )
}

/// Writes text one character at a time, flushing and pausing after each.
pub struct TypingWriter<W: Write> {
    inner: W,
    delay: Duration,
}

impl<W: Write> TypingWriter<W> {
    pub fn new(inner: W, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn type_text(&mut self, text: &str) -> io::Result<()> {
        if self.delay.is_zero() {
            self.inner.write_all(text.as_bytes())?;
            return self.inner.flush();
        }
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.inner.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            self.inner.flush()?;
            thread::sleep(self.delay);
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
