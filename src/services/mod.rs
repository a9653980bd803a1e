// Service exports
pub mod backend;
pub mod inflight;
pub mod store;

pub use backend::{BackendClient, BackendError, FailureKind};
pub use inflight::{Action, ActionGuard, InFlight};
pub use store::{LocalStore, StoreError, StoreEvent, StoreKey};
