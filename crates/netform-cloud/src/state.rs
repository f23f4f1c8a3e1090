//! Flattened resource state as handed to the orchestration engine
//!
//! Handlers work with typed state structs. The engine persists resources as
//! an identifier plus a map of attributes; [`ResourceData`] converts between
//! the two.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Persisted form of a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Remote identifier, empty once the resource is gone
    pub id: String,

    /// Resource type
    pub resource_type: String,

    /// Resource attributes (name, cidr_blocks, ...)
    pub attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            attributes: Map::new(),
        }
    }

    /// Flatten a typed state into attributes
    pub fn from_state<S: Serialize>(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        state: &S,
    ) -> Result<Self> {
        let attributes = match serde_json::to_value(state)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        Ok(Self {
            id: id.into(),
            resource_type: resource_type.into(),
            attributes,
        })
    }

    /// Rebuild a typed state from attributes
    pub fn to_state<S: serde::de::DeserializeOwned>(&self) -> Result<S> {
        Ok(serde_json::from_value(Value::Object(self.attributes.clone()))?)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}
