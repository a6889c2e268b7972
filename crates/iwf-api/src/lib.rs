// iwf-api: Async Rust client for the F5 iWorkflow REST API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod pools;
pub mod transport;

pub use auth::{AuthStrategy, DEFAULT_LOGIN_PROVIDER};
pub use client::IWorkflowClient;
pub use error::Error;
pub use models::{
    DeviceReferenceRecord, LicensePoolRecord, ManagedDeviceRecord, MemberState, PoolMemberRecord,
};
pub use transport::{TlsMode, TransportConfig};
