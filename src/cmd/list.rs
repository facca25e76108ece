/*!
`list.rs`

Implements the `list` subcommand of a resource branch.

  <alias> list [-a ATTR...] [-w WIDTH...] [-p PACK] [-t TOKEN] [-j]

Behavior:
  - Fetches every instance through the type's manager
  - Pack-scoped types accept `--pack` and forward it as a `pack` filter
  - Renders a multi-column table projected to `--attr`
    (default: id name description; `all` shows every attribute)
  - `--width` fixes column widths in order; longer cells are truncated
  - `--json` prints the projected instances as a JSON array instead
*/

use std::io::Write;

use anyhow::Result;
use clap::{Arg, Command};

use crate::cmd::format::{RenderOptions, TableShape};
use crate::cmd::scope::Scope;
use crate::cmd::shared::{
    ARG_PACK, ARG_WIDTH, CommandArgs, CommandBase, ResourceCommand, attr_arg, base_command,
};
use crate::resource::{Filters, Managers, ResourceType};

pub const LIST_DISPLAY_ATTRIBUTES: &[&str] = &["id", "name", "description"];

pub struct ResourceListCommand<R> {
    base: CommandBase<R>,
    attributes: &'static [&'static str],
}

impl<R: ResourceType> ResourceListCommand<R> {
    pub fn new(scope: Scope) -> Self {
        Self::with_attributes(scope, LIST_DISPLAY_ATTRIBUTES)
    }

    /// List whose default `--attr` selection and column order is `attributes`.
    pub fn with_attributes(scope: Scope, attributes: &'static [&'static str]) -> Self {
        Self {
            base: CommandBase::new(scope),
            attributes,
        }
    }

    pub fn run(&self, args: &CommandArgs, managers: &Managers) -> Result<Vec<R>> {
        let manager = self.base.manager(managers)?;
        let filters = if self.base.scope().has_pack_filter() {
            Filters::new().with("pack", args.pack.as_deref())
        } else {
            Filters::new()
        };
        tracing::debug!(resource = R::PLURAL_DISPLAY_NAME, scope = %self.base.scope(), ?filters, "listing");
        manager.get_all(&filters, args.token())
    }
}

impl<R: ResourceType> ResourceCommand for ResourceListCommand<R> {
    fn name(&self) -> &'static str {
        "list"
    }

    fn command(&self) -> Command {
        let cmd = base_command(
            "list",
            format!("Get the list of {}.", R::PLURAL_DISPLAY_NAME.to_lowercase()),
        )
        .arg(attr_arg(
            self.attributes,
            "List of attributes to include in the output. \"all\" will return all attributes.",
        ))
        .arg(
            Arg::new(ARG_WIDTH)
                .short('w')
                .long("width")
                .num_args(1..)
                .value_parser(clap::value_parser!(usize))
                .help("Set the width of columns in output."),
        );

        if self.base.scope().has_pack_filter() {
            cmd.arg(
                Arg::new(ARG_PACK)
                    .short('p')
                    .long("pack")
                    .value_name("PACK")
                    .help("Only return resources belonging to the provided pack"),
            )
        } else {
            cmd
        }
    }

    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()> {
        let instances = self.run(args, managers)?;
        self.base.print_instances(
            out,
            &instances,
            &RenderOptions {
                shape: TableShape::MultiColumn,
                attributes: &args.attributes,
                widths: args.widths.as_deref(),
                display_order: self.attributes,
                json: args.json,
            },
        )
    }
}
