//! Command identifiers exposed to the host.
//!
//! An editor binds each identifier to a zero-argument handler; on invocation the
//! handler calls [`Dispatcher::handle`](crate::dispatch::Dispatcher::handle)
//! with the bound action.

use crate::command::ActionKind;
use std::collections::BTreeMap;

/// Whatever the host uses to bind identifiers to handlers.
pub trait CommandRegistry {
    fn register(&mut self, command_id: &'static str, action: ActionKind);
}

/// Register every runner command with the host.
pub fn activate<R: CommandRegistry>(registry: &mut R) {
    for action in ActionKind::ALL {
        registry.register(action.command_id(), action);
    }
    tracing::debug!(count = ActionKind::ALL.len(), "registered runner commands");
}

/// A plain lookup table, for hosts without a registration surface of their own.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    commands: BTreeMap<&'static str, ActionKind>,
}

impl CommandTable {
    /// A table with every runner command already registered.
    pub fn activated() -> Self {
        let mut table = Self::default();
        activate(&mut table);
        table
    }

    pub fn lookup(&self, command_id: &str) -> Option<ActionKind> {
        self.commands.get(command_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ActionKind)> + '_ {
        self.commands.iter().map(|(id, action)| (*id, *action))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandRegistry for CommandTable {
    fn register(&mut self, command_id: &'static str, action: ActionKind) {
        self.commands.insert(command_id, action);
    }
}
