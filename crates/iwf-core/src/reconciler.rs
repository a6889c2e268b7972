// ── Pool membership reconciler ──
//
// Drives one desired-state run: resolve devices, look up the pool, read
// its members, diff, then create or delete members. Creation waits for
// each new member to be licensed before moving on. Check mode performs
// every read and stops short of the first write.
//
// Members created before a later failure are left in place; there is no
// rollback.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::diff;
use crate::error::CoreError;
use crate::model::{
    DesiredState, DeviceReference, LicensePool, PoolMember, Presence, ReconcileOutcome,
};
use crate::resolver;
use crate::session::RemoteSession;
use crate::waiter::{self, WaitPolicy};

pub struct Reconciler<'a, S> {
    session: &'a S,
    wait: WaitPolicy,
}

impl<'a, S: RemoteSession> Reconciler<'a, S> {
    pub fn new(session: &'a S, wait: WaitPolicy) -> Self {
        Self { session, wait }
    }

    /// Bring the pool in line with `desired`.
    pub async fn reconcile(&self, desired: &DesiredState) -> Result<ReconcileOutcome, CoreError> {
        let resolved = resolver::resolve(self.session, &desired.devices).await?;
        let want: BTreeSet<DeviceReference> = resolved.into_iter().collect();
        let outcome = ReconcileOutcome::unchanged(desired, want.iter().cloned().collect());

        let pool = self.load_pool_by_name(&desired.pool).await?;
        debug!(pool = %pool.name, state = %desired.state, devices = want.len(), "reconciling");

        match desired.state {
            Presence::Present => self.present(&pool, &want, desired.check_mode, outcome).await,
            Presence::Absent => self.absent(&pool, &want, desired.check_mode, outcome).await,
        }
    }

    /// Find the one pool called `name`.
    pub async fn load_pool_by_name(&self, name: &str) -> Result<LicensePool, CoreError> {
        let mut pools = self.session.find_pools(name).await?;
        match pools.len() {
            0 => Err(CoreError::PoolNotFound { name: name.into() }),
            1 => Ok(pools.remove(0)),
            count => Err(CoreError::AmbiguousPool {
                name: name.into(),
                count,
            }),
        }
    }

    async fn read_current(&self, pool: &LicensePool) -> Result<Vec<PoolMember>, CoreError> {
        let members = self.session.list_members(pool).await?;
        debug!(pool = %pool.name, members = members.len(), "loaded pool members");
        Ok(members)
    }

    async fn present(
        &self,
        pool: &LicensePool,
        want: &BTreeSet<DeviceReference>,
        check_mode: bool,
        mut outcome: ReconcileOutcome,
    ) -> Result<ReconcileOutcome, CoreError> {
        let have = self.read_current(pool).await?;
        if diff::exists(want, &have) {
            return Ok(outcome);
        }

        let additions = diff::to_add(want, &have);
        outcome.changed = true;
        outcome.added = additions.iter().cloned().collect();
        if check_mode {
            debug!(count = additions.len(), "check mode: skipping member creation");
            return Ok(outcome);
        }

        for device in &additions {
            let member = self.session.create_member(pool, device).await?;
            info!(pool = %pool.name, %device, member = %member.self_link, "added pool member");
            waiter::wait_for_license(self.session, &member, &self.wait).await?;
        }
        Ok(outcome)
    }

    async fn absent(
        &self,
        pool: &LicensePool,
        want: &BTreeSet<DeviceReference>,
        check_mode: bool,
        mut outcome: ReconcileOutcome,
    ) -> Result<ReconcileOutcome, CoreError> {
        let have = self.read_current(pool).await?;
        if !diff::any_present(want, &have) {
            return Ok(outcome);
        }

        let removals = diff::to_remove(want, &have);
        outcome.changed = true;
        outcome.removed.clone_from(&removals);
        if check_mode {
            debug!(count = removals.len(), "check mode: skipping member removal");
            return Ok(outcome);
        }

        for link in &removals {
            self.session.delete_member(link).await?;
            info!(pool = %pool.name, member = %link, "removed pool member");
        }

        let after = self.read_current(pool).await?;
        let remaining = diff::to_remove(want, &after);
        if !remaining.is_empty() {
            return Err(CoreError::RemovalVerification {
                pool: pool.name.clone(),
                remaining,
            });
        }
        Ok(outcome)
    }
}
