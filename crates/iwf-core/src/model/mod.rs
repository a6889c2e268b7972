// ── Domain model ──
//
// Types the reconciler works with. They are decoupled from the wire
// records in `iwf_api::models`; `crate::convert` bridges the two.

pub mod desired;
pub mod device;
pub mod pool;

pub use desired::{DesiredState, Presence, ReconcileOutcome};
pub use device::{Device, DeviceReference, DeviceSpec, MANAGED_PRODUCT, MatchedOn};
pub use pool::{LicensePool, MemberState, PoolMember};
