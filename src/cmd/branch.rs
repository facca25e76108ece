/*!
`branch.rs`

A resource branch is the command group for one resource type:

  <alias> list | get | create | update | delete

Commands default to the generic implementations for the branch's scope.
Any of them can be replaced by passing an override keyed by command name;
read-only branches register only `list` and `get`.
*/

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cmd::create::ResourceCreateCommand;
use crate::cmd::delete::ResourceDeleteCommand;
use crate::cmd::get::ResourceGetCommand;
use crate::cmd::list::ResourceListCommand;
use crate::cmd::scope::Scope;
use crate::cmd::shared::{CommandArgs, ResourceCommand};
use crate::cmd::update::ResourceUpdateCommand;
use crate::resource::{Managers, ResourceError, ResourceType};

/// Replacement commands, keyed by their `name()`.
#[derive(Default)]
pub struct Overrides(HashMap<&'static str, Box<dyn ResourceCommand>>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, command: impl ResourceCommand + 'static) -> Self {
        self.0.insert(command.name(), Box::new(command));
        self
    }

    fn take_or(&mut self, name: &'static str, default: impl FnOnce() -> Box<dyn ResourceCommand>) -> Box<dyn ResourceCommand> {
        self.0.remove(name).unwrap_or_else(default)
    }
}

pub struct ResourceBranch {
    name: String,
    description: String,
    plural: String,
    commands: Vec<Box<dyn ResourceCommand>>,
}

impl ResourceBranch {
    /// Branch with the default commands for `scope`.
    pub fn new<R: ResourceType>(description: impl Into<String>, scope: Scope, read_only: bool) -> Self {
        Self::with_overrides::<R>(description, scope, read_only, Overrides::new())
    }

    pub fn with_overrides<R: ResourceType>(
        description: impl Into<String>,
        scope: Scope,
        read_only: bool,
        mut overrides: Overrides,
    ) -> Self {
        let mut commands: Vec<Box<dyn ResourceCommand>> = vec![
            overrides.take_or("list", || Box::new(ResourceListCommand::<R>::new(scope))),
            overrides.take_or("get", || Box::new(ResourceGetCommand::<R>::new(scope))),
        ];
        if !read_only {
            commands.push(overrides.take_or("create", || Box::new(ResourceCreateCommand::<R>::new(scope))));
            commands.push(overrides.take_or("update", || Box::new(ResourceUpdateCommand::<R>::new(scope))));
            commands.push(overrides.take_or("delete", || Box::new(ResourceDeleteCommand::<R>::new(scope))));
        }

        Self {
            name: R::ALIAS.to_lowercase(),
            description: description.into(),
            plural: R::PLURAL_DISPLAY_NAME.to_lowercase(),
            commands,
        }
    }

    /// Namespace the branch is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn ResourceCommand> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone())
            .about(self.description.clone())
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand_help_heading(format!("List of commands for managing {}.", self.plural));
        for c in &self.commands {
            cmd = cmd.subcommand(c.command());
        }
        cmd
    }

    /// Run the subcommand selected in `matches` (the branch's own matches).
    pub fn dispatch(
        &self,
        matches: &ArgMatches,
        default_token: Option<&str>,
        managers: &Managers,
        out: &mut dyn Write,
    ) -> Result<()> {
        let (name, sub) = matches
            .subcommand()
            .ok_or_else(|| ResourceError::Command(format!("No command given for {}", self.name)))?;
        let command = self
            .get(name)
            .ok_or_else(|| ResourceError::Command(format!("Unknown command '{name}' for {}", self.name)))?;

        let args = CommandArgs::from_matches(sub).or_token(default_token);
        tracing::debug!(branch = %self.name, command = name, "dispatching");
        command.run_and_print(&args, managers, out)
    }
}
