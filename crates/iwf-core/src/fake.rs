// In-memory `RemoteSession` for unit tests. Records every call so tests
// can assert on reads and mutations.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::CoreError;
use crate::model::{
    Device, DeviceReference, LicensePool, MANAGED_PRODUCT, MemberState, PoolMember,
};
use crate::session::RemoteSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListDevices,
    FindPools(String),
    ListMembers,
    Create(DeviceReference),
    Refresh(String),
    Delete(String),
}

#[derive(Default)]
struct State {
    devices: Vec<Device>,
    pools: Vec<LicensePool>,
    members: Vec<PoolMember>,
    script: VecDeque<MemberState>,
    ignore_deletes: bool,
    next_member: usize,
    calls: Vec<Call>,
}

#[derive(Default)]
pub(crate) struct FakeSession {
    state: Mutex<State>,
}

/// A BIG-IP named `{name}.example.net` with deterministic addresses.
pub(crate) fn device(name: &str) -> Device {
    let n = name.bytes().fold(0u8, u8::wrapping_add);
    Device {
        reference: DeviceReference::new(format!(
            "https://localhost/mgmt/shared/resolver/device-groups/cm-cloud-managed-devices/devices/{name}"
        )),
        product: Some(MANAGED_PRODUCT.into()),
        hostname: Some(format!("{name}.example.net")),
        address: Some(format!("10.0.0.{n}")),
        management_address: Some(format!("192.168.0.{n}")),
    }
}

impl FakeSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn with_device(self, device: Device) -> Self {
        self.lock().devices.push(device);
        self
    }

    pub(crate) fn with_pool(self, name: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.pools.len() + 1;
            state.pools.push(LicensePool {
                name: name.into(),
                self_link: format!("https://localhost/mgmt/cm/shared/licensing/pools/pool-{id}"),
            });
        }
        self
    }

    /// Add an already licensed member for `device`.
    pub(crate) fn with_member(self, device: &Device) -> Self {
        {
            let mut state = self.lock();
            let link = next_member_link(&mut state);
            state.members.push(PoolMember {
                self_link: link,
                device: Some(device.reference.clone()),
                state: MemberState::Licensed,
                error: None,
            });
        }
        self
    }

    /// States returned by successive refreshes; LICENSED once exhausted.
    pub(crate) fn with_script(self, states: impl IntoIterator<Item = MemberState>) -> Self {
        self.lock().script.extend(states);
        self
    }

    /// Accept deletes without removing anything.
    pub(crate) fn ignoring_deletes(self) -> Self {
        self.lock().ignore_deletes = true;
        self
    }

    pub(crate) fn pools(&self) -> Vec<LicensePool> {
        self.lock().pools.clone()
    }

    pub(crate) fn members(&self) -> Vec<PoolMember> {
        self.lock().members.clone()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Refresh(_)))
            .count()
    }

    pub(crate) fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Create(_) | Call::Delete(_)))
            .count()
    }
}

fn next_member_link(state: &mut State) -> String {
    state.next_member += 1;
    format!(
        "https://localhost/mgmt/cm/shared/licensing/pools/pool-1/members/m-{}",
        state.next_member
    )
}

impl RemoteSession for FakeSession {
    async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::ListDevices);
        Ok(state.devices.clone())
    }

    async fn find_pools(&self, name: &str) -> Result<Vec<LicensePool>, CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::FindPools(name.into()));
        Ok(state
            .pools
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }

    async fn list_members(&self, _pool: &LicensePool) -> Result<Vec<PoolMember>, CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::ListMembers);
        Ok(state.members.clone())
    }

    async fn create_member(
        &self,
        _pool: &LicensePool,
        device: &DeviceReference,
    ) -> Result<PoolMember, CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::Create(device.clone()));
        let member = PoolMember {
            self_link: next_member_link(&mut state),
            device: Some(device.clone()),
            state: MemberState::Pending,
            error: None,
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn refresh_member(&self, member_link: &str) -> Result<PoolMember, CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::Refresh(member_link.into()));
        let next = state.script.pop_front().unwrap_or(MemberState::Licensed);
        let member = state
            .members
            .iter_mut()
            .find(|m| m.self_link == member_link)
            .ok_or_else(|| CoreError::Api {
                message: format!("no member {member_link}"),
                status: Some(404),
            })?;
        member.state = next;
        if next == MemberState::Failed {
            member.error = Some("license activation refused".into());
        }
        Ok(member.clone())
    }

    async fn delete_member(&self, member_link: &str) -> Result<(), CoreError> {
        let mut state = self.lock();
        state.calls.push(Call::Delete(member_link.into()));
        if !state.ignore_deletes {
            state.members.retain(|m| m.self_link != member_link);
        }
        Ok(())
    }
}
