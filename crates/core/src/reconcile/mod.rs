//! Dependency reconciliation
//!
//! Brings an app's installed function dependencies in line with a desired
//! set using an API that only offers "set version" and "remove" per package,
//! plus one shared, eventually-consistent status endpoint.
//!
//! The status endpoint is not partitioned per operation, which makes strict
//! serialization a correctness requirement rather than a simplification:
//! every management call is polled to a terminal state before the next one is
//! issued. See [`DependencyReconciler`] for the ordering and failure
//! contract.

pub mod delta;
pub mod poller;
pub mod ports;
pub mod service;

pub use delta::DependencyDelta;
pub use poller::StatusPoller;
pub use ports::DependencyApi;
pub use service::DependencyReconciler;
