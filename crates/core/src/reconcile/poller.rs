//! Poll the shared management-status channel to a terminal state

use std::future::Future;
use std::time::Duration;

use mantle_domain::constants::{MAX_POLL_ATTEMPTS, POLL_INTERVAL_SECS};
use mantle_domain::{DependencyOperation, ManagementState, ManagementStatus, MantleError, Result};
use tracing::debug;

/// Polls a status source until it reports a terminal state or the attempt
/// budget runs out.
///
/// The poller is stateless across calls: every invocation starts its own
/// counter, and nothing about nonces, sessions, or progress survives between
/// invocations. Unknown status strings count as still-pending; the bounded
/// attempt budget is the only escape from a stuck pending state.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    interval: Duration,
    max_attempts: usize,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

impl StatusPoller {
    /// Poller with a custom interval and attempt budget.
    pub fn new(interval: Duration, max_attempts: usize) -> Self {
        Self { interval, max_attempts: max_attempts.max(1) }
    }

    /// Read status until `Successful` (ok), `Failed` (fatal, carries the
    /// remote message), or `max_attempts` reads without a terminal state
    /// (timeout naming the operation). Pending and unknown states sleep for
    /// the configured interval between reads; no sleep follows the final
    /// read. Errors from `read_status` itself propagate immediately.
    pub async fn wait_until_complete<F, Fut>(
        &self,
        operation: &DependencyOperation,
        mut read_status: F,
    ) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ManagementStatus>>,
    {
        for attempt in 1..=self.max_attempts {
            let status = read_status().await?;
            match status.state {
                ManagementState::Successful => {
                    debug!(operation = %operation, attempt, "management operation completed");
                    return Ok(());
                }
                ManagementState::Failed => {
                    return Err(MantleError::ManagementFailed {
                        dependency: operation.name().to_string(),
                        version: operation.version().to_string(),
                        kind: operation.kind(),
                        message: status.message,
                    });
                }
                state => {
                    debug!(
                        operation = %operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        %state,
                        "management operation still pending"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.interval).await;
                    }
                }
            }
        }

        Err(MantleError::ManagementTimeout {
            dependency: operation.name().to_string(),
            version: operation.version().to_string(),
            kind: operation.kind(),
        })
    }
}
