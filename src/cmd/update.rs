/*!
`update.rs`

  <alias> update <name-or-id | ref-or-id> <FILE> [-t TOKEN] [-j]

Steps:
  1. the file must exist (checked before any backend call)
  2. the file is parsed as JSON or YAML
  3. the identifier is resolved with the scope's strategy, and the document
     is decoded into a candidate instance
  4. a candidate without id takes the resolved id; a candidate whose id
     differs from the resolved one is rejected without calling `update`
  5. the reconciled instance is submitted and printed with every attribute
*/

use std::io::Write;

use anyhow::Result;
use clap::Command;

use crate::cmd::scope::Scope;
use crate::cmd::shared::{
    CommandArgs, CommandBase, ResourceCommand, base_command, ensure_file, file_arg, identifier_arg,
};
use crate::resource::{Managers, ResourceError, ResourceType};
use crate::utils::read_document;

pub struct ResourceUpdateCommand<R> {
    base: CommandBase<R>,
}

impl<R: ResourceType> ResourceUpdateCommand<R> {
    pub fn new(scope: Scope) -> Self {
        Self {
            base: CommandBase::new(scope),
        }
    }

    pub fn run(&self, args: &CommandArgs, managers: &Managers) -> Result<R> {
        let path = ensure_file(args.file.as_deref())?;
        let document = read_document(path)?;

        let manager = self.base.manager(managers)?;
        let existing = self
            .base
            .get_resource(manager.as_ref(), args.identifier(), args.token())?;

        let candidate = reconcile(R::from_document(document)?, &existing)?;
        manager.update(&candidate, args.token())
    }
}

/// Give `candidate` the id of `existing`, or reject it when it already names
/// a different resource.
fn reconcile<R: ResourceType>(mut candidate: R, existing: &R) -> Result<R> {
    let existing_id = existing.id().unwrap_or_default();
    let candidate_id = candidate.id().map(str::to_string);
    match candidate_id.as_deref() {
        None | Some("") => candidate.set_id(existing_id.to_string()),
        Some(id) if id != existing_id => {
            return Err(ResourceError::IdMismatch {
                resource: R::DISPLAY_NAME.to_lowercase(),
            }
            .into());
        }
        Some(_) => {}
    }
    Ok(candidate)
}

impl<R: ResourceType> ResourceCommand for ResourceUpdateCommand<R> {
    fn name(&self) -> &'static str {
        "update"
    }

    fn command(&self) -> Command {
        let display = self.base.display_name_lower();
        base_command("update", format!("Updating an existing {display}."))
            .arg(identifier_arg(self.base.scope(), R::DISPLAY_NAME))
            .arg(file_arg(format!("JSON file containing the {display} to update.")))
    }

    fn run_and_print(&self, args: &CommandArgs, managers: &Managers, out: &mut dyn Write) -> Result<()> {
        let instance = self.run(args, managers)?;
        self.base.print_full(out, &instance, args.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::is_not_found;
    use crate::resource::memory::{Gadget, MemoryManager};
    use std::io::Write as _;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn setup() -> (Arc<MemoryManager<Gadget>>, Managers, String) {
        let m = Arc::new(MemoryManager::<Gadget>::new());
        let id = m.seed(Gadget {
            name: "local".into(),
            pack: "core".into(),
            description: "old".into(),
            ..Gadget::default()
        });
        let mut managers = Managers::new();
        managers.register::<Gadget>(m.clone());
        (m, managers, id)
    }

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn parse(argv: &[&str]) -> CommandArgs {
        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        CommandArgs::from_matches(&cmd.command().try_get_matches_from(argv).unwrap())
    }

    #[test]
    fn file_without_id_takes_resolved_id() {
        let (m, managers, id) = setup();
        let file = json_file(r#"{"name": "local", "pack": "core", "description": "new"}"#);

        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        let updated = cmd
            .run(&parse(&["update", "core.local", file.path().to_str().unwrap()]), &managers)
            .unwrap();

        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(m.stored(&id).unwrap().description, "new");
        assert_eq!(m.calls().last(), Some(&"update"));
    }

    #[test]
    fn matching_id_is_accepted() {
        let (_m, managers, id) = setup();
        let file = json_file(&format!(r#"{{"id": "{id}", "name": "local", "description": "same"}}"#));

        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        let updated = cmd
            .run(&parse(&["update", &id, file.path().to_str().unwrap()]), &managers)
            .unwrap();
        assert_eq!(updated.description, "same");
    }

    #[test]
    fn mismatched_id_fails_without_update() {
        let (m, managers, _id) = setup();
        let file = json_file(r#"{"id": "ffffffffffffffffffffffff", "name": "local"}"#);

        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        let err = cmd
            .run(&parse(&["update", "core.local", file.path().to_str().unwrap()]), &managers)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::IdMismatch { .. })
        ));
        assert_eq!(
            err.to_string(),
            "The value for the gadget type id in the JSON file does not match the ID provided in the command line arguments."
        );
        assert!(!m.calls().contains(&"update"));
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let (m, managers, _) = setup();
        let file = json_file(r#"{"name": "x"}"#);

        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        let err = cmd
            .run(&parse(&["update", "core.missing", file.path().to_str().unwrap()]), &managers)
            .unwrap_err();
        assert!(is_not_found(&err));
        assert!(!m.calls().contains(&"update"));
    }

    #[test]
    fn missing_file_fails_first() {
        let (m, managers, _) = setup();
        let cmd = ResourceUpdateCommand::<Gadget>::new(Scope::ContentPack);
        let err = cmd
            .run(&parse(&["update", "core.local", "/no/such/file.json"]), &managers)
            .unwrap_err();
        assert_eq!(err.to_string(), "File \"/no/such/file.json\" does not exist.");
        assert!(m.calls().is_empty());
    }
}
