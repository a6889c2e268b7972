// ── Device identity types ──
//
// A device is named by the operator with a free-form identifier and
// known to the controller by its resolver `selfLink`. `DeviceSpec`
// carries either form into the reconciler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product family of the devices iWorkflow can license from a pool.
pub const MANAGED_PRODUCT: &str = "BIG-IP";

const DEVICE_LINK_MARKER: &str = "/mgmt/shared/resolver/device-groups/";

/// Origin the controller uses in every link it returns.
const LINK_ORIGIN: &str = "https://localhost";
const REST_ROOT: &str = "/mgmt/";

// ── DeviceReference ─────────────────────────────────────────────────

/// Canonical identity of a device: its resolver `selfLink`.
///
/// Pool membership is expressed against this value, never against the
/// member record's own link. Links are rebased onto `https://localhost`
/// so a reference copied from the controller's real host, or given as a
/// bare `/mgmt/...` path, equals the one the controller hands back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DeviceReference(String);

impl DeviceReference {
    pub fn new(link: impl Into<String>) -> Self {
        let link = link.into();
        match link.find(REST_ROOT) {
            Some(at) if &link[..at] != LINK_ORIGIN => Self(format!("{LINK_ORIGIN}{}", &link[at..])),
            _ => Self(link),
        }
    }

    /// Accept `input` only if it is shaped like a device resolver link
    /// (`.../mgmt/shared/resolver/device-groups/{group}/devices/{id}`).
    pub fn from_link(input: &str) -> Option<Self> {
        let (_, rest) = input.split_once(DEVICE_LINK_MARKER)?;
        let (group, device) = rest.split_once("/devices/")?;
        let device = device.split('?').next().unwrap_or_default();
        if group.is_empty() || group.contains('/') || device.is_empty() || device.contains('/') {
            return None;
        }
        Some(Self::new(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DeviceReference {
    fn from(link: String) -> Self {
        Self::new(link)
    }
}

impl From<DeviceReference> for String {
    fn from(reference: DeviceReference) -> Self {
        reference.0
    }
}

impl fmt::Display for DeviceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── DeviceSpec ──────────────────────────────────────────────────────

/// A device as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceSpec {
    /// Hostname, address, or management address still to be looked up.
    Unresolved(String),
    /// Already a canonical reference; resolution is skipped.
    Resolved(DeviceReference),
}

impl DeviceSpec {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl FromStr for DeviceSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(DeviceReference::from_link(s)
            .map_or_else(|| Self::Unresolved(s.to_owned()), Self::Resolved))
    }
}

impl From<DeviceReference> for DeviceSpec {
    fn from(reference: DeviceReference) -> Self {
        Self::Resolved(reference)
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(id) => f.write_str(id),
            Self::Resolved(reference) => write!(f, "{reference}"),
        }
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// Which field of a device record matched an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MatchedOn {
    Hostname,
    Address,
    ManagementAddress,
}

/// Inventory entry from the managed device group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub reference: DeviceReference,
    pub product: Option<String>,
    pub hostname: Option<String>,
    pub address: Option<String>,
    pub management_address: Option<String>,
}

impl Device {
    /// Only BIG-IP devices can be members of a license pool.
    pub fn is_managed_product(&self) -> bool {
        self.product.as_deref() == Some(MANAGED_PRODUCT)
    }

    /// Match `identifier` against hostname, then address, then
    /// management address.
    pub fn match_identifier(&self, identifier: &str) -> Option<MatchedOn> {
        let eq = |field: &Option<String>| field.as_deref() == Some(identifier);
        if eq(&self.hostname) {
            Some(MatchedOn::Hostname)
        } else if eq(&self.address) {
            Some(MatchedOn::Address)
        } else if eq(&self.management_address) {
            Some(MatchedOn::ManagementAddress)
        } else {
            None
        }
    }
}
