// iwf-core: License pool membership reconciliation between iwf-api and the CLI.

pub mod config;
pub mod controller;
pub mod convert;
pub mod diff;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod resolver;
pub mod session;
pub mod waiter;

#[cfg(test)]
pub(crate) mod fake;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use reconciler::Reconciler;
pub use session::RemoteSession;
pub use waiter::WaitPolicy;

pub use iwf_api::DEFAULT_LOGIN_PROVIDER;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DesiredState, Device, DeviceReference, DeviceSpec, LicensePool, MANAGED_PRODUCT, MemberState,
    PoolMember, Presence, ReconcileOutcome,
};
