/*!
shared.rs - plumbing common to every resource command.

Focus:
  - ResourceCommand: object-safe surface a branch stores and dispatches to
  - CommandArgs: parsed invocation input, built from clap matches
  - CommandBase: scope-dependent identifier resolution, not-found reporting,
    output rendering
  - option wiring (-t/--token, -j/--json, identifier, -a/--attr)
*/

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::cmd::format::{RenderOptions, Rendered, StyleOptions, TableShape, render};
use crate::cmd::scope::Scope;
use crate::resource::{Lookup, Managers, ResourceError, ResourceManager, ResourceType};

/* ---- Command Surface ---- */

/// One subcommand of a resource branch (`list`, `get`, ...).
pub trait ResourceCommand {
    /// Subcommand name, also the override key in a branch.
    fn name(&self) -> &'static str;

    /// Argument definition for this command.
    fn command(&self) -> Command;

    /// Run the command and write its output to `out`.
    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()>;
}

/* ---- Arguments ---- */

/// Parsed input of one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    pub identifier: Option<String>,
    pub file: Option<PathBuf>,
    pub attributes: Vec<String>,
    pub widths: Option<Vec<usize>>,
    pub pack: Option<String>,
    pub token: Option<String>,
    pub json: bool,
}

impl CommandArgs {
    /// Collect whichever arguments the matched command defines.
    pub fn from_matches(m: &ArgMatches) -> Self {
        let string = |id: &str| m.try_get_one::<String>(id).ok().flatten().cloned();

        Self {
            identifier: string(ARG_IDENTIFIER),
            file: m.try_get_one::<PathBuf>(ARG_FILE).ok().flatten().cloned(),
            attributes: m
                .try_get_many::<String>(ARG_ATTR)
                .ok()
                .flatten()
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            widths: m
                .try_get_many::<usize>(ARG_WIDTH)
                .ok()
                .flatten()
                .map(|v| v.copied().collect()),
            pack: string(ARG_PACK),
            token: string(ARG_TOKEN),
            json: m.try_get_one::<bool>(ARG_JSON).ok().flatten().copied().unwrap_or(false),
        }
    }

    /// Use `fallback` when no token was given on the command line.
    pub fn or_token(mut self, fallback: Option<&str>) -> Self {
        if self.token.is_none() {
            self.token = fallback.map(str::to_string);
        }
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or_default()
    }
}

pub const ARG_IDENTIFIER: &str = "identifier";
pub const ARG_FILE: &str = "file";
pub const ARG_ATTR: &str = "attr";
pub const ARG_WIDTH: &str = "width";
pub const ARG_PACK: &str = "pack";
pub const ARG_TOKEN: &str = "token";
pub const ARG_JSON: &str = "json";

/// Subcommand with the options every resource command accepts.
pub fn base_command(name: &'static str, about: String) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new(ARG_TOKEN)
                .short('t')
                .long("token")
                .value_name("TOKEN")
                .help("Access token for user authentication. Read from RESCTL_AUTH_TOKEN by default."),
        )
        .arg(
            Arg::new(ARG_JSON)
                .short('j')
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Prints output in JSON format."),
        )
}

pub fn identifier_arg(scope: Scope, display_name: &str) -> Arg {
    Arg::new(ARG_IDENTIFIER)
        .value_name(scope.pk_argument())
        .required(true)
        .help(scope.pk_help(display_name))
}

pub fn file_arg(help: String) -> Arg {
    Arg::new(ARG_FILE)
        .value_name("FILE")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help(help)
}

pub fn attr_arg(defaults: &'static [&'static str], help: &'static str) -> Arg {
    Arg::new(ARG_ATTR)
        .short('a')
        .long("attr")
        .num_args(1..)
        .default_values(defaults.iter().copied())
        .help(help)
}

/// Fail before any backend call when the input file is missing.
pub fn ensure_file(path: Option<&Path>) -> Result<&Path> {
    match path {
        Some(p) if p.is_file() => Ok(p),
        Some(p) => Err(ResourceError::FileNotFound(p.to_path_buf()).into()),
        None => Err(ResourceError::FileNotFound(PathBuf::new()).into()),
    }
}

/* ---- Resolution ---- */

/// Name lookup, then a best-effort id lookup. Errors from the id lookup are
/// discarded (a name is often not a well-formed id).
pub fn get_resource_by_name_or_id<R: ResourceType>(
    manager: &dyn ResourceManager<R>,
    name_or_id: &str,
    token: Option<&str>,
) -> Result<R> {
    let instance = match manager.get_by_name(name_or_id, token)? {
        Some(found) => Some(found),
        None => get_by_id_best_effort(manager, name_or_id, token),
    };

    instance.ok_or_else(|| {
        ResourceError::NotFound {
            identifier: name_or_id.to_string(),
            lookup: Lookup::NameOrId,
        }
        .into()
    })
}

fn get_by_id_best_effort<R: ResourceType>(
    manager: &dyn ResourceManager<R>,
    id: &str,
    token: Option<&str>,
) -> Option<R> {
    match manager.get_by_id(id, token) {
        Ok(found) => found,
        Err(e) => {
            tracing::debug!("id lookup for '{id}' failed after name miss: {e:#}");
            None
        }
    }
}

pub fn get_resource_by_ref_or_id<R: ResourceType>(
    manager: &dyn ResourceManager<R>,
    ref_or_id: &str,
    token: Option<&str>,
) -> Result<R> {
    manager.get_by_ref_or_id(ref_or_id, token)?.ok_or_else(|| {
        ResourceError::NotFound {
            identifier: ref_or_id.to_string(),
            lookup: Lookup::RefOrId,
        }
        .into()
    })
}

/* ---- Command Base ---- */

/// State shared by the five commands of a resource type: the scope, and the
/// resource type itself (as a type parameter).
#[derive(Debug)]
pub struct CommandBase<R> {
    scope: Scope,
    _resource: PhantomData<fn() -> R>,
}

impl<R> CommandBase<R> {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            _resource: PhantomData,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl<R: ResourceType> CommandBase<R> {
    pub fn display_name_lower(&self) -> String {
        R::DISPLAY_NAME.to_lowercase()
    }

    pub fn manager(&self, managers: &Managers) -> Result<Arc<dyn ResourceManager<R>>> {
        managers.manager::<R>()
    }

    /// Resolve an identifier with this scope's strategy.
    pub fn get_resource(&self, manager: &dyn ResourceManager<R>, identifier: &str, token: Option<&str>) -> Result<R> {
        match self.scope.lookup() {
            Lookup::NameOrId => get_resource_by_name_or_id(manager, identifier, token),
            Lookup::RefOrId => get_resource_by_ref_or_id(manager, identifier, token),
        }
    }

    pub fn print_not_found(&self, out: &mut dyn Write, identifier: &str) -> Result<()> {
        writeln!(out, "{} \"{}\" is not found.", R::DISPLAY_NAME, identifier)?;
        Ok(())
    }

    pub fn print_instances(&self, out: &mut dyn Write, instances: &[R], opts: &RenderOptions<'_>) -> Result<()> {
        let docs = instances
            .iter()
            .map(R::to_document)
            .collect::<Result<Vec<_>>>()?;
        self.print_rendered(out, &Rendered::Many(docs), opts)
    }

    pub fn print_instance(&self, out: &mut dyn Write, instance: &R, opts: &RenderOptions<'_>) -> Result<()> {
        self.print_rendered(out, &Rendered::One(instance.to_document()?), opts)
    }

    /// Property/value output of every attribute, used after create and update.
    pub fn print_full(&self, out: &mut dyn Write, instance: &R, json: bool) -> Result<()> {
        let all = [String::from("all")];
        self.print_instance(
            out,
            instance,
            &RenderOptions {
                shape: TableShape::PropertyValue,
                attributes: &all,
                widths: None,
                display_order: self.scope.display_order(),
                json,
            },
        )
    }

    fn print_rendered(&self, out: &mut dyn Write, subject: &Rendered, opts: &RenderOptions<'_>) -> Result<()> {
        let text = render(subject, opts, &StyleOptions::detect())?;
        writeln!(out, "{text}")?;
        Ok(())
    }
}

/* ---- Tests ---- */
