use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which identifier form a failed lookup accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    NameOrId,
    RefOrId,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::NameOrId => f.write_str("name"),
            Lookup::RefOrId => f.write_str("reference"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ResourceError {
    /// The identifier did not resolve to an instance.
    #[error("Resource with id or {lookup} \"{identifier}\" doesn't exist.")]
    NotFound { identifier: String, lookup: Lookup },

    /// Command-level misuse, e.g. a subcommand the branch does not register.
    #[error("{0}")]
    Command(String),

    #[error("File \"{}\" does not exist.", .0.display())]
    FileNotFound(PathBuf),

    /// The id in an update file names a different resource than the command line.
    #[error(
        "The value for the {resource} id in the JSON file does not match the ID provided in the command line arguments."
    )]
    IdMismatch { resource: String },
}

impl ResourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}

/// True when `err` (or anything in its chain) is a not-found error.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<ResourceError>())
        .any(ResourceError::is_not_found)
}
