// Device inventory endpoints
//
// iWorkflow tracks the devices it can license in the
// `cm-cloud-managed-devices` device group of the shared resolver.

use tracing::debug;

use crate::client::IWorkflowClient;
use crate::error::Error;
use crate::models::ManagedDeviceRecord;

/// Device group holding every device iWorkflow manages.
pub const MANAGED_DEVICE_GROUP: &str = "cm-cloud-managed-devices";

impl IWorkflowClient {
    /// List all managed devices.
    ///
    /// `GET /mgmt/shared/resolver/device-groups/cm-cloud-managed-devices/devices`
    pub async fn list_managed_devices(&self) -> Result<Vec<ManagedDeviceRecord>, Error> {
        let url = self.api_url(&format!(
            "shared/resolver/device-groups/{MANAGED_DEVICE_GROUP}/devices"
        ))?;
        debug!("listing managed devices");
        self.get_collection(url).await
    }
}
