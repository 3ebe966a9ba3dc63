// src/commands/registry.rs
use std::collections::HashMap;
use super::types::Command;

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use super::cd::CdCommand;
use super::exit_cmd::ExitCommand;
use super::ls::LsCommand;
use super::pwd::PwdCommand;
use super::uptime_cmd::UptimeCommand;

/// Register the shell's built-in commands.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(PwdCommand));
    registry.register(Box::new(UptimeCommand));
    registry.register(Box::new(ExitCommand));
}

/// A registry holding every built-in command.
pub fn create_builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    registry
}
