/*!
`doc.rs`

  doc escape <FILE>
  doc unescape <FILE>

Decodes a JSON or YAML document, rewrites its mapping keys with the
reserved-character transform and prints the result as pretty JSON.
*/

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::cmd::shared::ensure_file;
use crate::utils::escape::{escape_chars, unescape_chars};
use crate::utils::read_document;

/// CLI arguments for `resctl doc <action> <FILE>`
#[derive(Args, Debug)]
pub struct DocArgs {
    #[command(subcommand)]
    pub action: DocAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DocAction {
    /// Replace '.' and '$' in keys with their fullwidth substitutes
    Escape {
        /// JSON or YAML document
        file: PathBuf,
    },
    /// Restore '.' and '$' in keys
    Unescape {
        /// JSON or YAML document
        file: PathBuf,
    },
}

/// Entry point for the doc subcommand.
pub fn execute_doc(args: DocArgs, out: &mut dyn Write) -> Result<()> {
    let (file, transform): (&PathBuf, fn(Value) -> Value) = match &args.action {
        DocAction::Escape { file } => (file, escape_chars),
        DocAction::Unescape { file } => (file, unescape_chars),
    };

    let path = ensure_file(Some(file.as_path()))?;
    let document = transform(read_document(path)?);
    writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
    Ok(())
}
