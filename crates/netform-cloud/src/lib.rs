//! netform resource lifecycle
//!
//! Provider-agnostic building blocks for resource handlers that map
//! declarative configuration onto remote API calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          orchestration engine (external)         │
//! │        plan / apply / state persistence          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 netform-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │       trait Resource { create, read,      │   │
//! │  │         update, delete, import, plan }    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ wait (poll)  │  │ retry        │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────────┐
//! │ netform-cloud-    │
//! │ ucloud (VPC,      │
//! │ subnet)           │
//! └───────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod provider;
pub mod retry;
pub mod state;
pub mod wait;

// Re-exports
pub use action::{ActionType, AttributeChange, Plan};
pub use error::{CloudError, Result};
pub use provider::{ReadOutcome, Resource};
pub use retry::{RetryConfig, RetryOutcome, retry};
pub use state::ResourceData;
pub use wait::{ConvergenceState, Refresh, StateChangeConf};
