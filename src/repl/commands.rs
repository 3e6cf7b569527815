//! The single-key command table.

use std::fmt::Write as _;

/// Actions bound to command keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Print the configured API user.
    ShowUser,
    /// Print the configured server URL.
    ShowUrl,
    /// Compose a query from project/issue type/status menus and run it.
    BuildQuery,
    /// Run inline JQL, or pick a saved query or type a new one.
    RunQuery,
    /// Run the most recently saved query again.
    RerunLast,
    /// Choose the fields returned in results.
    SetReturnFields,
    /// Choose the fields appended as ORDER BY.
    SetOrderByFields,
    /// Flip count-only mode.
    ToggleCountOnly,
    /// Flip raw JSON mode.
    ToggleRawJson,
    /// Print the session state.
    ShowInfo,
}

/// A key bound to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The key that triggers the command.
    pub key: char,
    /// Help text shown by `?`.
    pub description: &'static str,
    /// What the command does.
    pub action: CommandAction,
}

impl Command {
    fn new(key: char, action: CommandAction, description: &'static str) -> Self {
        Self {
            key,
            description,
            action,
        }
    }
}

/// Ordered table of commands.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    /// Create the table with every REPL command, in help order.
    pub fn new() -> Self {
        use CommandAction::*;

        let commands = vec![
            Command::new('u', ShowUser, "Show the JIRA API user"),
            Command::new('U', ShowUrl, "Show the JIRA server URL"),
            Command::new(
                'b',
                BuildQuery,
                "Build a JQL query from project, issue type and status menus",
            ),
            Command::new('j', RunQuery, "Prompt for a JQL query and run it"),
            Command::new('J', RerunLast, "Re-run last jql query"),
            Command::new('r', SetReturnFields, "Set return fields for search results"),
            Command::new('o', SetOrderByFields, "Set order by fields for search results"),
            Command::new('c', ToggleCountOnly, "Toggle count-only for search results"),
            Command::new('R', ToggleRawJson, "Toggle raw JSON for search results"),
            Command::new('i', ShowInfo, "Show info about current settings"),
        ];

        Self { commands }
    }

    /// Find the command bound to `key`. Keys are case-sensitive.
    pub fn get(&self, key: char) -> Option<&Command> {
        self.commands.iter().find(|c| c.key == key)
    }

    /// All commands in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Help listing, one `key  description` line per command plus the
    /// host-loop keys.
    pub fn help_text(&self) -> String {
        let mut text = String::new();
        for command in &self.commands {
            let _ = writeln!(text, "  {}  {}", command.key, command.description);
        }
        text.push_str("  :  Enter a command with arguments, e.g. `:j project = AB`\n");
        text.push_str("  ?  Show this help\n");
        text.push_str("  q  Quit\n");
        text
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
