// ── License pool domain types ──

use serde::{Deserialize, Serialize};

use super::device::DeviceReference;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensePool {
    pub name: String,
    pub self_link: String,
}

/// Licensing lifecycle of a pool member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    Pending,
    Installing,
    Licensed,
    Failed,
    Unknown,
}

impl MemberState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Licensed | Self::Failed)
    }
}

/// A device's membership in a pool.
///
/// `self_link` identifies the membership record and is what deletion
/// and refresh use; `device` identifies the licensed device and is what
/// membership comparison uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolMember {
    pub self_link: String,
    pub device: Option<DeviceReference>,
    pub state: MemberState,
    /// Failure details reported by the controller.
    pub error: Option<String>,
}
