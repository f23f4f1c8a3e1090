//! Planned change types for a single resource

use serde::{Deserialize, Serialize};

/// Kind of change a plan will perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource in place
    Update,
    /// Destroy and recreate because a force-new attribute changed
    Replace,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Replace => write!(f, "replace"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// A single changed attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name (e.g., "cidr_blocks")
    pub attribute: String,

    /// Whether changing this attribute forces a new resource
    pub force_new: bool,
}

impl AttributeChange {
    pub fn in_place(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            force_new: false,
        }
    }

    pub fn force_new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            force_new: true,
        }
    }
}

/// Planned change for one resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Resource type (e.g., "ucloud_vpc")
    pub resource_type: String,

    /// Resource identifier, empty when the resource does not exist yet
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Attributes that differ between prior and proposed configuration
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    /// Classify a set of attribute changes against an existing resource.
    pub fn from_changes(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        changes: Vec<AttributeChange>,
    ) -> Self {
        let action_type = if changes.is_empty() {
            ActionType::NoOp
        } else if changes.iter().any(|c| c.force_new) {
            ActionType::Replace
        } else {
            ActionType::Update
        };

        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            action_type,
            changes,
        }
    }

    pub fn create(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: String::new(),
            action_type: ActionType::Create,
            changes: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.action_type != ActionType::NoOp
    }

    /// Names of attributes forcing replacement
    pub fn replaced_by(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.force_new)
            .map(|c| c.attribute.as_str())
            .collect()
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action_type, self.resource_type)?;
        if !self.id.is_empty() {
            write!(f, " {:?}", self.id)?;
        }
        if !self.changes.is_empty() {
            let names: Vec<&str> = self.changes.iter().map(|c| c.attribute.as_str()).collect();
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}
