// ── Device resolution ──
//
// Turns operator-supplied identifiers into device references by scanning
// the managed device inventory. Specs that are already references pass
// through untouched, and the inventory is only fetched when something
// actually needs resolving.

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Device, DeviceReference, DeviceSpec};
use crate::session::RemoteSession;

/// Resolve every spec, fetching the inventory from `session` if needed.
pub async fn resolve<S: RemoteSession>(
    session: &S,
    specs: &[DeviceSpec],
) -> Result<Vec<DeviceReference>, CoreError> {
    let inventory = if specs.iter().all(DeviceSpec::is_resolved) {
        Vec::new()
    } else {
        session.list_devices().await?
    };
    resolve_in(specs, &inventory)
}

/// Resolve every spec against an already loaded inventory.
///
/// Output order follows input order. All unresolvable identifiers are
/// reported together in a single [`CoreError::DeviceNotFound`].
pub fn resolve_in(
    specs: &[DeviceSpec],
    inventory: &[Device],
) -> Result<Vec<DeviceReference>, CoreError> {
    let mut resolved = Vec::with_capacity(specs.len());
    let mut missing = Vec::new();

    for spec in specs {
        match spec {
            DeviceSpec::Resolved(reference) => resolved.push(reference.clone()),
            DeviceSpec::Unresolved(identifier) => match find_device(identifier, inventory) {
                Some(device) => resolved.push(device.reference.clone()),
                None => missing.push(identifier.clone()),
            },
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(CoreError::DeviceNotFound {
            identifiers: missing,
        })
    }
}

/// The single managed device matching `identifier`, if there is exactly one.
fn find_device<'a>(identifier: &str, inventory: &'a [Device]) -> Option<&'a Device> {
    let mut matches = inventory
        .iter()
        .filter(|d| d.is_managed_product())
        .filter_map(|d| d.match_identifier(identifier).map(|on| (d, on)));

    let (device, matched_on) = matches.next()?;
    let others = matches
        .filter(|(d, _)| d.reference != device.reference)
        .count();

    if others > 0 {
        warn!(
            identifier,
            candidates = others + 1,
            "identifier matches several managed devices"
        );
        return None;
    }

    debug!(identifier, %matched_on, device = %device.reference, "resolved device");
    Some(device)
}
