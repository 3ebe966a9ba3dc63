// src/commands/mod.rs
pub mod cd;
pub mod exit_cmd;
pub mod ls;
pub mod pwd;
pub mod registry;
pub mod types;
pub mod uptime_cmd;

pub use registry::{create_builtin_registry, CommandRegistry};
pub use types::{Command, CommandContext, CommandResult};
