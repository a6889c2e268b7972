// iWorkflow REST response types
//
// Collections come back as `{ "items": [...] }` with paging and kind
// metadata alongside; only `items` is modelled. Fields use
// `#[serde(default)]` liberally because records differ across
// iWorkflow releases and device states.

use serde::{Deserialize, Serialize};

// ── Collection envelope ──────────────────────────────────────────────

/// Standard collection wrapper. An empty collection omits `items`
/// entirely, so it defaults to an empty list.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// ── Device inventory ─────────────────────────────────────────────────

/// Device record from the `cm-cloud-managed-devices` device group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDeviceRecord {
    pub self_link: String,
    #[serde(default)]
    pub uuid: Option<String>,
    /// Product family, e.g. `"BIG-IP"`.
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub management_address: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── License pools ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensePoolRecord {
    pub self_link: String,
    #[serde(default)]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Licensing state of a pool member.
///
/// Anything the controller reports besides `LICENSED` and `FAILED`
/// (`INSTALLING`, `REVOKING`, newer values) is treated as in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    Pending,
    Installing,
    Licensed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Expanded `deviceReference` on a pool member.
///
/// Without `$expand=deviceReference` only `link` is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReferenceRecord {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_address: Option<String>,
}

/// Member record from `pools/{uuid}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberRecord {
    pub self_link: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub state: MemberState,
    #[serde(default)]
    pub device_reference: Option<DeviceReferenceRecord>,
    /// Free-form failure description set when licensing fails.
    #[serde(default)]
    pub error_text: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PoolMemberRecord {
    /// Human-readable failure details, combining whichever of
    /// `errorText` / `errors` the controller populated.
    pub fn error_details(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(text) = self.error_text.as_deref().filter(|t| !t.is_empty()) {
            parts.push(text.to_owned());
        }
        match &self.errors {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(s)) if s.is_empty() => {}
            Some(serde_json::Value::String(s)) => parts.push(s.clone()),
            Some(serde_json::Value::Array(a)) if a.is_empty() => {}
            Some(other) => parts.push(other.to_string()),
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LinkBody<'a> {
    pub link: &'a str,
}

/// `POST pools/{uuid}/members`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateMemberBody<'a> {
    pub device_reference: LinkBody<'a>,
}
