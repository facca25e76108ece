//! Resource capability contracts.
//!
//! ResourceType   -> descriptor + (de)serialization of one kind of remote entity
//! ResourceManager -> backend operations for one resource type
//! Managers       -> type-keyed lookup the commands use at run time
//! ResourceError  -> not-found / validation taxonomy

pub mod error;
pub mod manager;
#[cfg(test)]
pub mod memory;

use std::fmt::Debug;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{Lookup, ResourceError, is_not_found};
pub use manager::{Filters, Managers, ResourceManager};

/// Descriptor of a manageable resource kind.
///
/// Implemented by the instance type itself; the associated constants carry
/// the naming and the provided methods carry the document contract.
pub trait ResourceType: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Human readable singular name, e.g. `Trigger Type`.
    const DISPLAY_NAME: &'static str;
    /// Human readable plural name, e.g. `Trigger Types`.
    const PLURAL_DISPLAY_NAME: &'static str;
    /// Command namespace; lowercased when registered.
    const ALIAS: &'static str = Self::DISPLAY_NAME;

    /// Backend-assigned identifier, if the instance has one.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Path segment of the REST collection for this type.
    fn endpoint() -> String {
        Self::PLURAL_DISPLAY_NAME.to_lowercase().replace(' ', "")
    }

    /// Build an instance from a decoded document.
    fn from_document(raw: Value) -> Result<Self> {
        serde_json::from_value(raw)
            .with_context(|| format!("Invalid {} document", Self::DISPLAY_NAME.to_lowercase()))
    }

    /// Encode an instance as a document (used for display and requests).
    fn to_document(&self) -> Result<Value> {
        serde_json::to_value(self)
            .with_context(|| format!("Failed to encode {}", Self::DISPLAY_NAME.to_lowercase()))
    }
}
