//! In-memory manager and sample resource types for command tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Filters, ResourceManager, ResourceType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ResourceType for Widget {
    const DISPLAY_NAME: &'static str = "Widget";
    const PLURAL_DISPLAY_NAME: &'static str = "Widgets";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gadget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub description: String,
}

impl ResourceType for Gadget {
    const DISPLAY_NAME: &'static str = "Gadget Type";
    const PLURAL_DISPLAY_NAME: &'static str = "Gadget Types";
    const ALIAS: &'static str = "GadgetType";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Stores instances keyed by id and records every backend call by name.
///
/// Ids are 24 hex characters; `get_by_id` rejects anything else, the way an
/// object-id backend would.
pub struct MemoryManager<R> {
    items: Mutex<BTreeMap<String, R>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: Mutex<u64>,
}

impl<R: ResourceType> MemoryManager<R> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(0x507f_1f77),
        }
    }

    /// Insert an instance, assigning an id when it has none. Returns the id.
    pub fn seed(&self, mut instance: R) -> String {
        let id = match instance.id() {
            Some(id) => id.to_string(),
            None => {
                let id = self.allocate_id();
                instance.set_id(id.clone());
                id
            }
        };
        self.items.lock().unwrap().insert(id.clone(), instance);
        id
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self, id: &str) -> Option<R> {
        self.items.lock().unwrap().get(id).cloned()
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{:024x}", *next)
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn field(instance: &R, key: &str) -> Option<String> {
        instance
            .to_document()
            .ok()?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }

    fn find(&self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        self.items
            .lock()
            .unwrap()
            .values()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }
}

impl<R: ResourceType> ResourceManager<R> for MemoryManager<R> {
    fn get_all(&self, filters: &Filters, _token: Option<&str>) -> Result<Vec<R>> {
        self.record("get_all");
        Ok(self.find(|r| {
            filters
                .iter()
                .all(|(k, v)| Self::field(r, k).as_deref() == Some(v))
        }))
    }

    fn get_by_name(&self, name: &str, _token: Option<&str>) -> Result<Option<R>> {
        self.record("get_by_name");
        Ok(self
            .find(|r| Self::field(r, "name").as_deref() == Some(name))
            .into_iter()
            .next())
    }

    fn get_by_id(&self, id: &str, _token: Option<&str>) -> Result<Option<R>> {
        self.record("get_by_id");
        if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("'{id}' is not a valid ObjectId");
        }
        Ok(self.items.lock().unwrap().get(id).cloned())
    }

    fn get_by_ref_or_id(&self, ref_or_id: &str, _token: Option<&str>) -> Result<Option<R>> {
        self.record("get_by_ref_or_id");
        if let Some(found) = self.items.lock().unwrap().get(ref_or_id) {
            return Ok(Some(found.clone()));
        }
        let Some((pack, name)) = ref_or_id.split_once('.') else {
            return Ok(None);
        };
        Ok(self
            .find(|r| {
                Self::field(r, "pack").as_deref() == Some(pack)
                    && Self::field(r, "name").as_deref() == Some(name)
            })
            .into_iter()
            .next())
    }

    fn create(&self, instance: &R, _token: Option<&str>) -> Result<R> {
        self.record("create");
        let mut created = instance.clone();
        let id = self.allocate_id();
        created.set_id(id.clone());
        self.items.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    fn update(&self, instance: &R, _token: Option<&str>) -> Result<R> {
        self.record("update");
        let Some(id) = instance.id() else {
            bail!("cannot update an instance without id");
        };
        self.items
            .lock()
            .unwrap()
            .insert(id.to_string(), instance.clone());
        Ok(instance.clone())
    }

    fn delete(&self, instance: &R, _token: Option<&str>) -> Result<()> {
        self.record("delete");
        if let Some(id) = instance.id() {
            self.items.lock().unwrap().remove(id);
        }
        Ok(())
    }
}
