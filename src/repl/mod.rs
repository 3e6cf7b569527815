//! The interactive JQL session.
//!
//! [`Repl`] owns the session state and dispatches single-key commands to
//! handlers. Handlers that fail report the error and return to the prompt.

mod commands;
mod input;
mod render;
mod session;

use std::io::Write;

use tracing::{debug, error, info, instrument};

use crate::api::JiraClient;
use crate::config::FieldSettings;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::search::{search, with_order_by, QueryCriteria, SearchRequest};
use crate::store::{FieldType, Stores};

pub use commands::{Command, CommandAction, CommandTable};
pub use input::{input_for_key, parse_line, Input, InputSource, KeyReader};
pub use session::SessionState;

/// Prompt shown while waiting for a command.
pub const PROMPT: &str = "jira-repl> ";

/// Menu entry to reuse a saved query.
const SELECT_SAVED: &str = "Select a saved query";
/// Menu entry to type a new query.
const TYPE_NEW: &str = "Type a JQL query";

/// The interactive session.
pub struct Repl<P, W> {
    client: JiraClient,
    settings: FieldSettings,
    stores: Stores,
    prompter: P,
    out: W,
    commands: CommandTable,
    state: SessionState,
}

impl<P: Prompter, W: Write> Repl<P, W> {
    /// Create a session, loading the last field selections and query.
    ///
    /// Field types with no history are picked interactively.
    pub fn new(
        client: JiraClient,
        settings: FieldSettings,
        mut stores: Stores,
        mut prompter: P,
        out: W,
    ) -> Result<Self> {
        let return_fields =
            stores
                .selections
                .get_or_select(FieldType::Return, false, &settings, &mut prompter)?;
        let orderby_fields =
            stores
                .selections
                .get_or_select(FieldType::OrderBy, false, &settings, &mut prompter)?;
        let last_jql = stores
            .queries
            .find_most_recent()
            .map(|r| r.data.jql)
            .unwrap_or_default();

        let state = SessionState {
            return_fields,
            orderby_fields,
            count_only: false,
            raw_json: false,
            last_jql,
        };
        debug!(?state, "Session initialized");

        Ok(Self {
            client,
            settings,
            stores,
            prompter,
            out,
            commands: CommandTable::new(),
            state,
        })
    }

    /// The current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Read and run commands until the operator quits.
    pub async fn run<I: InputSource>(&mut self, input: &mut I) -> Result<()> {
        writeln!(self.out, "Press ? for help, q to quit.")?;

        loop {
            self.out.flush()?;
            let (action, args) = match input.next_input(PROMPT)? {
                Input::Quit => break,
                Input::Nothing => continue,
                Input::Help => {
                    let help = self.commands.help_text();
                    write!(self.out, "{}", help)?;
                    continue;
                }
                Input::Command { key, args } => match self.commands.get(key) {
                    Some(command) => (command.action, args),
                    None => {
                        writeln!(self.out, "Unknown command '{}'. Press ? for help.", key)?;
                        continue;
                    }
                },
            };

            if let Err(e) = self.execute(action, &args).await {
                error!(error = %e, ?action, "Command failed");
                writeln!(self.out, "Error: {}", e.user_message())?;
                if let Some(hint) = e.suggested_action() {
                    writeln!(self.out, "{}", hint)?;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Run one command.
    #[instrument(skip(self))]
    pub async fn execute(&mut self, action: CommandAction, args: &str) -> Result<()> {
        match action {
            CommandAction::ShowUser => {
                writeln!(self.out, "{}", self.client.user())?;
            }
            CommandAction::ShowUrl => {
                writeln!(self.out, "{}", self.client.base_url())?;
            }
            CommandAction::BuildQuery => self.build_query().await?,
            CommandAction::RunQuery => self.run_query(args).await?,
            CommandAction::RerunLast => self.rerun_last().await?,
            CommandAction::SetReturnFields => self.set_fields(FieldType::Return)?,
            CommandAction::SetOrderByFields => self.set_fields(FieldType::OrderBy)?,
            CommandAction::ToggleCountOnly => {
                let on = self.state.toggle_count_only();
                writeln!(self.out, "count_only: {}", on)?;
            }
            CommandAction::ToggleRawJson => {
                let on = self.state.toggle_raw_json();
                writeln!(self.out, "raw_json: {}", on)?;
            }
            CommandAction::ShowInfo => {
                render::write_json(&mut self.out, &self.state)?;
            }
        }
        Ok(())
    }

    /// Run inline JQL, or ask for a saved or typed query.
    async fn run_query(&mut self, inline: &str) -> Result<()> {
        let inline = inline.trim();
        let jql = if inline.is_empty() {
            match self.ask_for_query()? {
                Some(jql) => jql,
                None => return Ok(()),
            }
        } else {
            self.stores.queries.add(inline)?;
            inline.to_string()
        };
        self.run_jql(jql).await
    }

    /// Reuse a saved query or type a new one. `None` if the operator gave up.
    fn ask_for_query(&mut self) -> Result<Option<String>> {
        let menu = [SELECT_SAVED.to_string(), TYPE_NEW.to_string()];
        let Some(choice) = self.prompter.select("Choose one", &menu)? else {
            return Ok(None);
        };

        if choice == 0 {
            if let Some(jql) = self.stores.queries.choose_from_history(&mut self.prompter)? {
                return Ok(Some(jql));
            }
        }

        let Some(jql) = self.prompter.input("Enter your JQL query")? else {
            return Ok(None);
        };
        self.stores.queries.add(jql.as_str())?;
        Ok(Some(jql))
    }

    /// Run the most recently saved query as inline text, or ask for one if
    /// none exists.
    async fn rerun_last(&mut self) -> Result<()> {
        let last = self
            .stores
            .queries
            .find_most_recent()
            .map(|r| r.data.jql)
            .unwrap_or_default();
        self.run_query(&last).await
    }

    /// Compose a query from the configured menus, save it and run it.
    async fn build_query(&mut self) -> Result<()> {
        let criteria = QueryCriteria {
            projects: pick(&mut self.prompter, "Select projects", &self.settings.projects)?,
            issue_types: pick(
                &mut self.prompter,
                "Select issue types",
                &self.settings.issue_types,
            )?,
            statuses: pick(
                &mut self.prompter,
                "Select statuses",
                &self.settings.status_types,
            )?,
        };

        let Some(jql) = criteria.to_jql() else {
            writeln!(self.out, "Nothing selected.")?;
            return Ok(());
        };
        self.stores.queries.add(jql.as_str())?;
        self.run_jql(jql).await
    }

    /// Search with the session flags and print the outcome.
    async fn run_jql(&mut self, jql: String) -> Result<()> {
        let final_jql = with_order_by(&jql, &self.state.orderby_fields);
        self.state.last_jql = jql;

        let request = SearchRequest {
            jql: final_jql.clone(),
            fields: self.state.return_fields.clone(),
            count_only: self.state.count_only,
            raw: self.state.raw_json,
        };
        let outcome = search(&self.client, &request).await?;

        render::write_outcome(&mut self.out, &outcome)?;
        writeln!(self.out, "\njql: {}", final_jql)?;
        Ok(())
    }

    /// Choose fields of `field_type` and keep them if any were chosen.
    fn set_fields(&mut self, field_type: FieldType) -> Result<()> {
        let selection = self.stores.selections.choose_from_history_or_new(
            field_type,
            &self.settings,
            &mut self.prompter,
        )?;

        let changed = match field_type {
            FieldType::Return => self.state.set_return_fields(selection),
            FieldType::OrderBy => self.state.set_orderby_fields(selection),
        };
        if changed {
            info!(%field_type, "Session fields changed");
        }
        Ok(())
    }
}

/// Multi-select from `items`, skipping the prompt when there is nothing to pick.
fn pick(prompter: &mut dyn Prompter, prompt: &str, items: &[String]) -> Result<Vec<String>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let chosen = prompter.multi_select(prompt, items)?;
    Ok(chosen
        .into_iter()
        .filter_map(|i| items.get(i).cloned())
        .collect())
}
