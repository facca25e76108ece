//! Resource catalog: the concrete types the binary manages and how their
//! branches are wired.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiClient, RestManager};
use crate::cmd::list::ResourceListCommand;
use crate::cmd::{Overrides, ResourceBranch, Scope};
use crate::resource::{Managers, ResourceType};

macro_rules! impl_resource {
    ($ty:ty, $display:literal, $plural:literal, $alias:literal) => {
        impl ResourceType for $ty {
            const DISPLAY_NAME: &'static str = $display;
            const PLURAL_DISPLAY_NAME: &'static str = $plural;
            const ALIAS: &'static str = $alias;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
    ($ty:ty, $display:literal, $plural:literal, $alias:literal, endpoint = $endpoint:literal) => {
        impl ResourceType for $ty {
            const DISPLAY_NAME: &'static str = $display;
            const PLURAL_DISPLAY_NAME: &'static str = $plural;
            const ALIAS: &'static str = $alias;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }

            fn endpoint() -> String {
                $endpoint.to_string()
            }
        }
    };
}

/// An action runnable by the automation backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_type: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Sensors are registered by packs; the CLI only reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl_resource!(Action, "Action", "Actions", "Action");
impl_resource!(Rule, "Rule", "Rules", "Rule");
impl_resource!(Sensor, "Sensor", "Sensors", "Sensor", endpoint = "sensortypes");
impl_resource!(TriggerType, "Trigger Type", "Trigger Types", "Trigger");
impl_resource!(KeyValuePair, "Key Value Pair", "Key Value Pairs", "Key", endpoint = "keys");

const KEY_LIST_ATTRIBUTES: &[&str] = &["id", "name", "value"];

/// Command groups registered on the root command, in help order.
pub fn branches() -> Vec<ResourceBranch> {
    vec![
        ResourceBranch::new::<Action>(
            "An activity that happens as a response to the external event.",
            Scope::ContentPack,
            false,
        ),
        ResourceBranch::new::<Rule>(
            "A specification to invoke an \"action\" on a \"trigger\" selectively based on some criteria.",
            Scope::ContentPack,
            false,
        ),
        ResourceBranch::new::<Sensor>(
            "An adapter which allows you to integrate with external systems.",
            Scope::ContentPack,
            true,
        ),
        ResourceBranch::new::<TriggerType>(
            "An external event that is mapped to an action.",
            Scope::ContentPack,
            true,
        ),
        ResourceBranch::with_overrides::<KeyValuePair>(
            "Key value pairs stored in the datastore.",
            Scope::Resource,
            false,
            Overrides::new().with(ResourceListCommand::<KeyValuePair>::with_attributes(
                Scope::Resource,
                KEY_LIST_ATTRIBUTES,
            )),
        ),
    ]
}

/// One REST manager per catalog type, sharing a single HTTP client.
pub fn rest_managers(client: &Arc<ApiClient>) -> Managers {
    let mut managers = Managers::new();
    managers.register::<Action>(Arc::new(RestManager::<Action>::new(client.clone())));
    managers.register::<Rule>(Arc::new(RestManager::<Rule>::new(client.clone())));
    managers.register::<Sensor>(Arc::new(RestManager::<Sensor>::new(client.clone())));
    managers.register::<TriggerType>(Arc::new(RestManager::<TriggerType>::new(client.clone())));
    managers.register::<KeyValuePair>(Arc::new(RestManager::<KeyValuePair>::new(client.clone())));
    managers
}
