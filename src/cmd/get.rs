/*!
`get.rs`

Implements the `get` subcommand of a resource branch.

  <alias> get <name-or-id | ref-or-id> [-a ATTR...] [-t TOKEN] [-j]

Behavior:
  - Resolves exactly one instance with the scope's strategy
  - Renders a property/value table projected to `--attr` (default: all),
    preferred attributes first (id, [pack,] name, description)
  - A missing resource prints `<Display Name> "<identifier>" is not found.`
    and the command still succeeds
*/

use std::io::Write;

use anyhow::Result;
use clap::Command;

use crate::cmd::format::{RenderOptions, TableShape};
use crate::cmd::scope::Scope;
use crate::cmd::shared::{
    CommandArgs, CommandBase, ResourceCommand, attr_arg, base_command, identifier_arg,
};
use crate::resource::{Managers, ResourceType, is_not_found};

pub const GET_DISPLAY_ATTRIBUTES: &[&str] = &["all"];

pub struct ResourceGetCommand<R> {
    base: CommandBase<R>,
}

impl<R: ResourceType> ResourceGetCommand<R> {
    pub fn new(scope: Scope) -> Self {
        Self {
            base: CommandBase::new(scope),
        }
    }

    pub fn run(&self, args: &CommandArgs, managers: &Managers) -> Result<R> {
        let manager = self.base.manager(managers)?;
        self.base
            .get_resource(manager.as_ref(), args.identifier(), args.token())
    }
}

impl<R: ResourceType> ResourceCommand for ResourceGetCommand<R> {
    fn name(&self) -> &'static str {
        "get"
    }

    fn command(&self) -> Command {
        base_command(
            "get",
            format!("Get individual {}.", self.base.display_name_lower()),
        )
        .arg(identifier_arg(self.base.scope(), R::DISPLAY_NAME))
        .arg(attr_arg(
            GET_DISPLAY_ATTRIBUTES,
            "List of attributes to include in the output. \"all\" or unspecified will return all attributes.",
        ))
    }

    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()> {
        let instance = match self.run(args, managers) {
            Ok(instance) => instance,
            Err(e) if is_not_found(&e) => return self.base.print_not_found(out, args.identifier()),
            Err(e) => return Err(e),
        };

        self.base.print_instance(
            out,
            &instance,
            &RenderOptions {
                shape: TableShape::PropertyValue,
                attributes: &args.attributes,
                widths: None,
                display_order: self.base.scope().display_order(),
                json: args.json,
            },
        )
    }
}
