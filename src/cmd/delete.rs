/*!
`delete.rs`

  <alias> delete <name-or-id | ref-or-id> [-t TOKEN] [-j]

Resolves the instance and asks the manager to delete it. Nothing is printed
on success; an unknown identifier prints the not-found message instead of
failing.
*/

use std::io::Write;

use anyhow::Result;
use clap::Command;

use crate::cmd::scope::Scope;
use crate::cmd::shared::{CommandArgs, CommandBase, ResourceCommand, base_command, identifier_arg};
use crate::resource::{Managers, ResourceType, is_not_found};

pub struct ResourceDeleteCommand<R> {
    base: CommandBase<R>,
}

impl<R: ResourceType> ResourceDeleteCommand<R> {
    pub fn new(scope: Scope) -> Self {
        Self {
            base: CommandBase::new(scope),
        }
    }

    pub fn run(&self, args: &CommandArgs, managers: &Managers) -> Result<()> {
        let manager = self.base.manager(managers)?;
        let instance = self
            .base
            .get_resource(manager.as_ref(), args.identifier(), args.token())?;
        manager.delete(&instance, args.token())?;
        tracing::info!("deleted {} {}", self.base.display_name_lower(), args.identifier());
        Ok(())
    }
}

impl<R: ResourceType> ResourceCommand for ResourceDeleteCommand<R> {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn command(&self) -> Command {
        base_command(
            "delete",
            format!("Delete an existing {}.", self.base.display_name_lower()),
        )
        .arg(identifier_arg(self.base.scope(), R::DISPLAY_NAME))
    }

    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()> {
        match self.run(args, managers) {
            Err(e) if is_not_found(&e) => self.base.print_not_found(out, args.identifier()),
            other => other,
        }
    }
}
