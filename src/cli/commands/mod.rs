use std::collections::HashMap;

pub mod config;
pub mod month;
pub mod report;
pub mod system;
pub mod table;

use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(month::definitions());
    commands.extend(table::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once_in_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.first(), Some(&"month"));
        for name in ["salary", "bill", "charge", "rent", "duplicate", "reset", "show", "exit"] {
            assert!(registry.get(name).is_some(), "missing `{name}`");
        }
    }
}
