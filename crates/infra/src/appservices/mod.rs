/// App Services admin API client (bearer token)
///
/// Implements the dependency management, app and function ports from
/// `mantle-core` over `api/admin/v3.0`.
///
/// # Architecture
///
/// - **Auth**: `login` - exchanges an API key pair for a bearer token
/// - **Client**: `AppServicesClient` - one struct implementing
///   `DependencyApi`, `AppsApi` and `FunctionsApi`
///
/// # Usage
///
/// ```no_run
/// use std::sync::Arc;
///
/// use mantle_core::DependencyReconciler;
/// use mantle_domain::{AppTarget, ClientConfig, Credentials, DependencySet};
/// use mantle_infra::appservices::AppServicesClient;
///
/// # async fn example(current: DependencySet, desired: DependencySet) -> mantle_domain::Result<()> {
/// let credentials = Credentials::new("public-key", "private-key");
/// let client = AppServicesClient::login(&ClientConfig::default(), &credentials).await?;
///
/// let target = AppTarget::new("632a41e0f2a45b6e1c1a0000", "632a41e0f2a45b6e1c1a0001");
/// let reconciler = DependencyReconciler::new(Arc::new(client));
/// reconciler.reconcile(&target, &current, &desired).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - Network errors: surfaced as `MantleError::Network`, never retried here
/// - Unexpected statuses: `MantleError::UnexpectedStatus` with call context
/// - Management failures/timeouts: raised by the reconciler's poll loop
pub mod apps;
pub mod auth;
pub mod client;
pub mod dependencies;
pub mod functions;

pub use auth::login;
pub use client::AppServicesClient;
