// ── Remote session capability ──
//
// The reconciler only needs four collections from the controller: the
// device inventory, pools by name, a pool's members, and individual
// member records. `RemoteSession` names exactly those operations so the
// reconciler can be driven by `IWorkflowClient` or an in-memory fake.

use std::future::Future;

use iwf_api::IWorkflowClient;

use crate::error::CoreError;
use crate::model::{Device, DeviceReference, LicensePool, PoolMember};

pub trait RemoteSession {
    /// Every device in the managed device inventory.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    /// Pools whose name equals `name`. May return zero, one, or many.
    fn find_pools(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<LicensePool>, CoreError>> + Send;

    /// Current members of `pool`, with device references populated.
    fn list_members(
        &self,
        pool: &LicensePool,
    ) -> impl Future<Output = Result<Vec<PoolMember>, CoreError>> + Send;

    /// Add `device` to `pool`, returning the new member record.
    fn create_member(
        &self,
        pool: &LicensePool,
        device: &DeviceReference,
    ) -> impl Future<Output = Result<PoolMember, CoreError>> + Send;

    /// Re-read a member by its own self-link.
    fn refresh_member(
        &self,
        member_link: &str,
    ) -> impl Future<Output = Result<PoolMember, CoreError>> + Send;

    /// Delete a member by its own self-link.
    fn delete_member(
        &self,
        member_link: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl RemoteSession for IWorkflowClient {
    async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        let records = self.list_managed_devices().await?;
        Ok(records.into_iter().map(Device::from).collect())
    }

    async fn find_pools(&self, name: &str) -> Result<Vec<LicensePool>, CoreError> {
        let records = self.find_pools_by_name(name).await?;
        Ok(records.into_iter().map(LicensePool::from).collect())
    }

    async fn list_members(&self, pool: &LicensePool) -> Result<Vec<PoolMember>, CoreError> {
        let records = self.list_pool_members(&pool.self_link).await?;
        Ok(records.into_iter().map(PoolMember::from).collect())
    }

    async fn create_member(
        &self,
        pool: &LicensePool,
        device: &DeviceReference,
    ) -> Result<PoolMember, CoreError> {
        let record = self
            .create_pool_member(&pool.self_link, device.as_str())
            .await?;
        let mut member = PoolMember::from(record);
        // Creation responses do not always echo the device reference.
        member.device.get_or_insert_with(|| device.clone());
        Ok(member)
    }

    async fn refresh_member(&self, member_link: &str) -> Result<PoolMember, CoreError> {
        Ok(self.get_pool_member(member_link).await?.into())
    }

    async fn delete_member(&self, member_link: &str) -> Result<(), CoreError> {
        Ok(self.delete_pool_member(member_link).await?)
    }
}
