//! Resource handler trait definition

use crate::action::Plan;
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of reading a resource from the remote service
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<S> {
    /// The resource exists; its refreshed state
    Found(S),
    /// The resource no longer exists. The caller clears its identifier.
    Absent,
}

impl<S> ReadOutcome<S> {
    pub fn is_absent(&self) -> bool {
        matches!(self, ReadOutcome::Absent)
    }

    pub fn found(self) -> Option<S> {
        match self {
            ReadOutcome::Found(state) => Some(state),
            ReadOutcome::Absent => None,
        }
    }
}

/// Lifecycle handler for one resource type
///
/// Each provider resource (VPC, subnet, ...) implements this trait. The
/// handler owns its provider context; operations carry only the typed
/// configuration and the remote identifier.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Validated declarative configuration
    type Config: Send + Sync;

    /// Refreshed state, configuration plus computed attributes
    type State: Send + Sync;

    /// Returns the resource type name (e.g., "ucloud_vpc")
    fn resource_type(&self) -> &str;

    /// Classify the change from `prior` to `proposed` before anything is applied
    fn plan(&self, prior: Option<&Self::Config>, proposed: &Self::Config) -> Result<Plan>;

    /// Create the resource and wait until it is usable.
    ///
    /// A failure after the remote create succeeded is returned as
    /// [`CloudError::CreatedNotReady`](crate::CloudError::CreatedNotReady)
    /// carrying the new identifier.
    async fn create(&self, config: &Self::Config) -> Result<Self::State>;

    /// Refresh the resource. `prior` carries attributes the API does not return.
    async fn read(&self, id: &str, prior: Option<&Self::State>)
    -> Result<ReadOutcome<Self::State>>;

    /// Apply in-place changes from `old` to `new`
    async fn update(&self, id: &str, old: &Self::Config, new: &Self::Config)
    -> Result<Self::State>;

    /// Delete the resource. Deleting an absent resource succeeds.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Adopt an existing resource by identifier, used verbatim
    async fn import(&self, id: &str) -> Result<ReadOutcome<Self::State>> {
        tracing::info!(resource_type = self.resource_type(), id, "Importing resource");
        self.read(id, None).await
    }
}
