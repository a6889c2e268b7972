// ── Membership diffing ──
//
// Pure set arithmetic over device references. Members are compared by
// the device they license, never by their own self-link; removals are
// translated back to member self-links because deletion is keyed by the
// member record.

use std::collections::BTreeSet;

use crate::model::{DeviceReference, PoolMember};

/// Device references currently licensed by the pool.
pub fn current(have: &[PoolMember]) -> BTreeSet<&DeviceReference> {
    have.iter().filter_map(|m| m.device.as_ref()).collect()
}

/// `true` when every wanted device is already a member.
pub fn exists(want: &BTreeSet<DeviceReference>, have: &[PoolMember]) -> bool {
    let have = current(have);
    want.iter().all(|d| have.contains(d))
}

/// `true` when at least one wanted device is a member.
pub fn any_present(want: &BTreeSet<DeviceReference>, have: &[PoolMember]) -> bool {
    let have = current(have);
    want.iter().any(|d| have.contains(d))
}

/// Wanted devices that are not members yet.
pub fn to_add(want: &BTreeSet<DeviceReference>, have: &[PoolMember]) -> BTreeSet<DeviceReference> {
    let have = current(have);
    want.iter()
        .filter(|d| !have.contains(d))
        .cloned()
        .collect()
}

/// Self-links of the members licensing a wanted device.
///
/// This is want ∩ have, not have minus want: `absent` unlicenses the
/// listed devices and leaves every other member of the pool alone.
///
/// Ordered by member self-link; a device listed in several member
/// records yields every one of them.
pub fn to_remove(want: &BTreeSet<DeviceReference>, have: &[PoolMember]) -> Vec<String> {
    have.iter()
        .filter(|m| m.device.as_ref().is_some_and(|d| want.contains(d)))
        .map(|m| m.self_link.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
