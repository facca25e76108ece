/*!
Command layer.

Resource commands are generic over a resource type and a scope, and are
grouped per type into a `ResourceBranch`:

  src/cmd/
    mod.rs      (this file)
    scope.rs    (Scope: plain vs content-pack resolution policy)
    shared.rs   (ResourceCommand trait, CommandArgs, CommandBase, resolution)
    list.rs / get.rs / create.rs / update.rs / delete.rs
    branch.rs   (ResourceBranch + Overrides)
    format.rs   (table / JSON rendering)
    doc.rs      (escape / unescape utility)

Conventions:
  - `run` performs the backend work and returns the typed result.
  - `run_and_print` renders it; get/delete turn not-found into a message.
  - Output goes to a caller-supplied writer so commands stay testable.
*/

pub mod branch;
pub mod create;
pub mod delete;
pub mod doc;
pub mod format;
pub mod get;
pub mod list;
pub mod scope;
pub mod shared;
pub mod update;

pub use branch::{Overrides, ResourceBranch};
pub use doc::{DocArgs, execute_doc};
pub use scope::Scope;
pub use shared::{CommandArgs, ResourceCommand};
