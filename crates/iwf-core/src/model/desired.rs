// ── Reconciliation input and output ──

use serde::{Deserialize, Serialize};

use super::device::{DeviceReference, DeviceSpec};

/// Whether the devices should be members of the pool.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    /// Member of the pool, and therefore licensed.
    #[default]
    Present,
    /// Not a member, and therefore unlicensed.
    Absent,
}

/// What the caller wants the pool to look like.
#[derive(Debug, Clone)]
pub struct DesiredState {
    pub pool: String,
    pub devices: Vec<DeviceSpec>,
    pub state: Presence,
    /// Compute and report the change without mutating the controller.
    pub check_mode: bool,
}

impl DesiredState {
    pub fn new(pool: impl Into<String>, devices: Vec<DeviceSpec>, state: Presence) -> Self {
        Self {
            pool: pool.into(),
            devices,
            state,
            check_mode: false,
        }
    }

    pub fn check_mode(mut self, enabled: bool) -> Self {
        self.check_mode = enabled;
        self
    }
}

/// Result of one reconciliation run.
///
/// Every field is part of the reported output; there is no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub changed: bool,
    pub pool: String,
    pub state: Presence,
    pub check_mode: bool,
    /// Resolved references for every requested device, deduplicated.
    pub devices: Vec<DeviceReference>,
    /// Device references that were (or, in check mode, would be) added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<DeviceReference>,
    /// Member self-links that were (or would be) removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl ReconcileOutcome {
    pub(crate) fn unchanged(desired: &DesiredState, devices: Vec<DeviceReference>) -> Self {
        Self {
            changed: false,
            pool: desired.pool.clone(),
            state: desired.state,
            check_mode: desired.check_mode,
            devices,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Flatten into `(field, value)` pairs in output order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("changed", self.changed.to_string()),
            ("pool", self.pool.clone()),
            ("state", self.state.to_string()),
            ("check_mode", self.check_mode.to_string()),
        ];
        rows.extend(self.devices.iter().map(|d| ("device", d.to_string())));
        rows.extend(self.added.iter().map(|d| ("added", d.to_string())));
        rows.extend(self.removed.iter().map(|m| ("removed", m.clone())));
        rows
    }
}
