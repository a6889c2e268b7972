// License pool endpoints
//
// Pools are looked up by name with an OData `$filter`; members live in
// the pool's `members` sub-collection and are addressed by their own
// `selfLink` afterwards.

use tracing::debug;
use url::Url;

use crate::client::IWorkflowClient;
use crate::error::Error;
use crate::models::{CreateMemberBody, LicensePoolRecord, LinkBody, PoolMemberRecord};

impl IWorkflowClient {
    /// Find license pools by exact name.
    ///
    /// `GET /mgmt/cm/shared/licensing/pools?$filter=name eq '{name}'`
    ///
    /// The controller does not enforce unique pool names, so zero, one,
    /// or several records may come back.
    pub async fn find_pools_by_name(&self, name: &str) -> Result<Vec<LicensePoolRecord>, Error> {
        let mut url = self.api_url("cm/shared/licensing/pools")?;
        url.query_pairs_mut()
            .append_pair("$filter", &format!("name eq '{}'", name.replace('\'', "''")));
        debug!(pool = name, "looking up license pool");
        self.get_collection(url).await
    }

    /// List a pool's members with their device references expanded.
    ///
    /// `GET {pool selfLink}/members?$expand=deviceReference`
    pub async fn list_pool_members(&self, pool_link: &str) -> Result<Vec<PoolMemberRecord>, Error> {
        let mut url = self.members_url(pool_link)?;
        url.query_pairs_mut()
            .append_pair("$expand", "deviceReference");
        debug!(pool = pool_link, "listing pool members");
        self.get_collection(url).await
    }

    /// Add a device to a pool, which starts licensing it.
    ///
    /// `POST {pool selfLink}/members` with `{"deviceReference": {"link": ...}}`
    pub async fn create_pool_member(
        &self,
        pool_link: &str,
        device_link: &str,
    ) -> Result<PoolMemberRecord, Error> {
        let url = self.members_url(pool_link)?;
        debug!(pool = pool_link, device = device_link, "creating pool member");
        let body = CreateMemberBody {
            device_reference: LinkBody { link: device_link },
        };
        self.post(url, &body).await
    }

    /// Re-read a single member.
    ///
    /// `GET {member selfLink}`
    pub async fn get_pool_member(&self, member_link: &str) -> Result<PoolMemberRecord, Error> {
        let url = self.link_url(member_link)?;
        self.get(url).await
    }

    /// Remove a member from its pool, which revokes the device's license.
    ///
    /// `DELETE {member selfLink}`
    pub async fn delete_pool_member(&self, member_link: &str) -> Result<(), Error> {
        let url = self.link_url(member_link)?;
        debug!(member = member_link, "deleting pool member");
        self.delete(url).await
    }

    fn members_url(&self, pool_link: &str) -> Result<Url, Error> {
        let mut url = self.link_url(pool_link)?;
        let path = format!("{}/members", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        Ok(url)
    }
}
