//! Wait for a remote resource to converge on its target state
//!
//! After a create call returns, the remote service may still report the
//! resource as missing for a while. [`StateChangeConf`] polls a refresh
//! function until it reports the resource as ready, a refresh fails, or the
//! timeout elapses.

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Observed convergence state of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    /// Not visible yet
    Pending,
    /// Visible and usable (terminal)
    Initialized,
}

impl ConvergenceState {
    /// Next state after an observation. `Initialized` is absorbing.
    pub fn advance(self, observed: ConvergenceState) -> ConvergenceState {
        match self {
            ConvergenceState::Initialized => ConvergenceState::Initialized,
            ConvergenceState::Pending => observed,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ConvergenceState::Initialized
    }
}

impl std::fmt::Display for ConvergenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceState::Pending => write!(f, "pending"),
            ConvergenceState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Result of one refresh
#[derive(Debug)]
pub enum Refresh<T> {
    Pending,
    Ready(T),
}

impl<T> Refresh<T> {
    pub fn state(&self) -> ConvergenceState {
        match self {
            Refresh::Pending => ConvergenceState::Pending,
            Refresh::Ready(_) => ConvergenceState::Initialized,
        }
    }
}

/// Polling schedule for [`StateChangeConf::wait_for_state`]
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    /// Wait before the first refresh
    pub delay: Duration,

    /// Wait between refreshes
    pub min_interval: Duration,

    /// Ceiling for the whole wait, including `delay`
    pub timeout: Duration,
}

impl Default for StateChangeConf {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            min_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(3 * 60),
        }
    }
}

impl StateChangeConf {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Poll `refresh` until it returns [`Refresh::Ready`].
    ///
    /// A refresh error ends the wait immediately and is returned as is.
    /// Running past `timeout` yields [`CloudError::Timeout`].
    pub async fn wait_for_state<T, F, Fut>(&self, resource: &str, mut refresh: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Refresh<T>>>,
    {
        let start = Instant::now();
        let mut state = ConvergenceState::Pending;
        let mut polls = 0u32;

        let poll = async {
            sleep(self.delay).await;
            loop {
                polls += 1;
                let outcome = refresh().await?;
                state = state.advance(outcome.state());
                tracing::debug!(resource, poll = polls, %state, "Refreshed state");

                if let Refresh::Ready(value) = outcome {
                    return Ok::<T, CloudError>(value);
                }
                sleep(self.min_interval).await;
            }
        };

        match tokio::time::timeout(self.timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(CloudError::Timeout {
                elapsed: start.elapsed(),
                message: format!(
                    "waiting for {resource} to become {}, last state {}",
                    ConvergenceState::Initialized,
                    ConvergenceState::Pending
                ),
            }),
        }
    }
}
