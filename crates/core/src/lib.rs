//! # Mantle Core
//!
//! Business logic and port definitions for Mantle.
//!
//! This crate contains:
//! - Port traits the infrastructure layer implements (`DependencyApi`,
//!   `AppsApi`, `FunctionsApi`, `ContainersApi`)
//! - The dependency reconciliation engine (delta computation, status
//!   polling, the reconciler service)
//!
//! ## Architecture
//! - Depends only on `mantle-domain`
//! - No I/O; everything impure arrives through `Arc<dyn Port>`

pub mod appservices_ports;
pub mod containers_ports;
pub mod reconcile;

// Re-export commonly used items
pub use appservices_ports::{AppsApi, FunctionsApi};
pub use containers_ports::ContainersApi;
pub use reconcile::{DependencyApi, DependencyDelta, DependencyReconciler, StatusPoller};
