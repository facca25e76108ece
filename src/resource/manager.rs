use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::{Result, anyhow};

use super::ResourceType;

/// Query filters passed to `get_all` (e.g. `pack`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; `None` values are skipped.
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), v.to_string());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Backend operations for one resource type. Every call accepts an optional
/// bearer token.
///
/// `get_by_name` and `get_by_ref_or_id` return `Ok(None)` when nothing matches.
/// `get_by_id` may also fail for malformed ids; callers decide whether that is
/// fatal.
pub trait ResourceManager<R: ResourceType>: Send + Sync {
    fn get_all(&self, filters: &Filters, token: Option<&str>) -> Result<Vec<R>>;

    fn get_by_name(&self, name: &str, token: Option<&str>) -> Result<Option<R>>;

    fn get_by_id(&self, id: &str, token: Option<&str>) -> Result<Option<R>>;

    fn get_by_ref_or_id(&self, ref_or_id: &str, token: Option<&str>) -> Result<Option<R>>;

    fn create(&self, instance: &R, token: Option<&str>) -> Result<R>;

    fn update(&self, instance: &R, token: Option<&str>) -> Result<R>;

    fn delete(&self, instance: &R, token: Option<&str>) -> Result<()>;
}

/// Type-keyed registry of managers, one per resource type.
#[derive(Default)]
pub struct Managers {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Managers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the manager for `R`.
    pub fn register<R: ResourceType>(&mut self, manager: Arc<dyn ResourceManager<R>>) {
        self.entries.insert(TypeId::of::<R>(), Box::new(manager));
    }

    pub fn manager<R: ResourceType>(&self) -> Result<Arc<dyn ResourceManager<R>>> {
        self.entries
            .get(&TypeId::of::<R>())
            .and_then(|m| m.downcast_ref::<Arc<dyn ResourceManager<R>>>())
            .cloned()
            .ok_or_else(|| anyhow!("No manager registered for {}", R::PLURAL_DISPLAY_NAME.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::memory::{MemoryManager, Widget};

    #[test]
    fn filters_skip_none() {
        let f = Filters::new().with("pack", None).with("enabled", Some("true"));
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![("enabled", "true")]);
    }

    #[test]
    fn registry_lookup() {
        let mut managers = Managers::new();
        assert!(managers.manager::<Widget>().is_err());

        managers.register::<Widget>(Arc::new(MemoryManager::<Widget>::new()));
        assert_eq!(managers.len(), 1);
        let m = managers.manager::<Widget>().unwrap();
        assert!(m.get_all(&Filters::new(), None).unwrap().is_empty());
    }

    #[test]
    fn missing_manager_message() {
        let managers = Managers::new();
        let err = managers.manager::<Widget>().err().unwrap();
        assert_eq!(err.to_string(), "No manager registered for widgets");
    }
}
