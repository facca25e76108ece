/*!
`create.rs`

  <alias> create <FILE> [-t TOKEN] [-j]

Reads a JSON (or YAML) document, builds an instance with the resource type's
`from_document`, submits it to the manager and prints the created instance
with every attribute. A missing file fails before any backend call.
*/

use std::io::Write;

use anyhow::Result;
use clap::Command;

use crate::cmd::scope::Scope;
use crate::cmd::shared::{CommandArgs, CommandBase, ResourceCommand, base_command, ensure_file, file_arg};
use crate::resource::{Managers, ResourceType};
use crate::utils::read_document;

pub struct ResourceCreateCommand<R> {
    base: CommandBase<R>,
}

impl<R: ResourceType> ResourceCreateCommand<R> {
    pub fn new(scope: Scope) -> Self {
        Self {
            base: CommandBase::new(scope),
        }
    }

    pub fn run(&self, args: &CommandArgs, managers: &Managers) -> Result<R> {
        let path = ensure_file(args.file.as_deref())?;
        let instance = R::from_document(read_document(path)?)?;

        let manager = self.base.manager(managers)?;
        let created = manager.create(&instance, args.token())?;
        tracing::info!(
            "created {} {}",
            self.base.display_name_lower(),
            created.id().unwrap_or("<no id>")
        );
        Ok(created)
    }
}

impl<R: ResourceType> ResourceCommand for ResourceCreateCommand<R> {
    fn name(&self) -> &'static str {
        "create"
    }

    fn command(&self) -> Command {
        let display = self.base.display_name_lower();
        base_command("create", format!("Create a new {display}."))
            .arg(file_arg(format!("JSON file containing the {display} to create.")))
    }

    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()> {
        let instance = self.run(args, managers)?;
        self.base.print_full(out, &instance, args.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceError;
    use crate::resource::memory::{MemoryManager, Widget};
    use std::io::Write as _;
    use std::sync::Arc;

    fn parse(argv: &[&str]) -> CommandArgs {
        let cmd = ResourceCreateCommand::<Widget>::new(Scope::Resource);
        CommandArgs::from_matches(&cmd.command().try_get_matches_from(argv).unwrap())
    }

    #[test]
    fn create_assigns_id_from_manager() {
        let m = Arc::new(MemoryManager::<Widget>::new());
        let mut managers = Managers::new();
        managers.register::<Widget>(m.clone());

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "x"}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let cmd = ResourceCreateCommand::<Widget>::new(Scope::Resource);
        let created = cmd.run(&parse(&["create", path]), &managers).unwrap();

        let id = created.id.clone().expect("manager assigns an id");
        assert_eq!(created.name, "x");
        assert_eq!(m.stored(&id), Some(created));
    }

    #[test]
    fn create_keeps_extra_attributes() {
        let m = Arc::new(MemoryManager::<Widget>::new());
        let mut managers = Managers::new();
        managers.register::<Widget>(m);

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "name: y\nenabled: true").unwrap();

        let cmd = ResourceCreateCommand::<Widget>::new(Scope::Resource);
        let mut out = Vec::new();
        cmd.run_and_print(&parse(&["create", file.path().to_str().unwrap(), "-j"]), &managers, &mut out)
            .unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["name"], "y");
        assert_eq!(printed["enabled"], true);
        assert!(printed["id"].is_string());
    }

    #[test]
    fn missing_file_fails_without_backend_call() {
        let m = Arc::new(MemoryManager::<Widget>::new());
        let mut managers = Managers::new();
        managers.register::<Widget>(m.clone());

        let cmd = ResourceCreateCommand::<Widget>::new(Scope::Resource);
        let err = cmd.run(&parse(&["create", "/no/such/file.json"]), &managers).unwrap_err();
        assert!(matches!(err.downcast_ref::<ResourceError>(), Some(ResourceError::FileNotFound(_))));
        assert!(m.calls().is_empty());
    }
}
