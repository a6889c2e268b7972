// ── API-to-domain type conversions ──
//
// Bridges raw `iwf_api` records into the domain types the reconciler
// consumes. Absent optional fields stay `None`; only the shape changes.

use iwf_api::models::{LicensePoolRecord, ManagedDeviceRecord, PoolMemberRecord};

use crate::model::{Device, DeviceReference, LicensePool, MemberState, PoolMember};

impl From<iwf_api::MemberState> for MemberState {
    fn from(state: iwf_api::MemberState) -> Self {
        match state {
            iwf_api::MemberState::Pending => Self::Pending,
            iwf_api::MemberState::Installing => Self::Installing,
            iwf_api::MemberState::Licensed => Self::Licensed,
            iwf_api::MemberState::Failed => Self::Failed,
            iwf_api::MemberState::Unknown => Self::Unknown,
        }
    }
}

impl From<ManagedDeviceRecord> for Device {
    fn from(d: ManagedDeviceRecord) -> Self {
        Self {
            reference: DeviceReference::new(d.self_link),
            product: d.product,
            hostname: d.hostname,
            address: d.address,
            management_address: d.management_address,
        }
    }
}

impl From<LicensePoolRecord> for LicensePool {
    fn from(p: LicensePoolRecord) -> Self {
        Self {
            name: p.name,
            self_link: p.self_link,
        }
    }
}

impl From<PoolMemberRecord> for PoolMember {
    fn from(m: PoolMemberRecord) -> Self {
        let error = m.error_details();
        Self {
            device: m.device_reference.map(|r| DeviceReference::new(r.link)),
            state: m.state.into(),
            self_link: m.self_link,
            error,
        }
    }
}
