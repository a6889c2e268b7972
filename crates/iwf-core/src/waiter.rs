// ── Licensing waiter ──
//
// After a member is created the controller licenses the device in the
// background. We poll the member record at a fixed interval until it is
// LICENSED or FAILED, giving up after a bounded number of reads.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::error::CoreError;
use crate::model::{DeviceReference, MemberState, PoolMember};
use crate::session::RemoteSession;

/// Polling schedule for a new member.
///
/// The default (10 s × 180) allows half an hour per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 180,
        }
    }
}

impl WaitPolicy {
    /// Worst-case time spent sleeping between polls.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Poll `member` until it leaves the in-progress states.
///
/// Each attempt is one read of the member record. There is no sleep after
/// the last attempt. A FAILED state ends the wait at once; running out of
/// attempts is reported as [`CoreError::LicensingTimeout`].
pub async fn wait_for_license<S: RemoteSession>(
    session: &S,
    member: &PoolMember,
    policy: &WaitPolicy,
) -> Result<PoolMember, CoreError> {
    let device = member
        .device
        .as_ref()
        .map_or_else(|| member.self_link.clone(), DeviceReference::to_string);

    debug!(
        %device,
        member = %member.self_link,
        attempts = policy.max_attempts,
        budget = ?policy.budget(),
        "waiting for license"
    );

    for attempt in 1..=policy.max_attempts {
        let current = session.refresh_member(&member.self_link).await?;
        trace!(%device, attempt, state = %current.state, "polled member");

        match current.state {
            MemberState::Licensed => {
                info!(%device, attempt, "device licensed");
                return Ok(current);
            }
            MemberState::Failed => {
                return Err(CoreError::LicensingFailed {
                    device,
                    member: member.self_link.clone(),
                    details: current
                        .error
                        .unwrap_or_else(|| "no error details reported".into()),
                });
            }
            MemberState::Pending | MemberState::Installing | MemberState::Unknown => {}
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(CoreError::LicensingTimeout {
        device,
        member: member.self_link.clone(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSession, device};
    use tokio::time::Instant;

    fn policy() -> WaitPolicy {
        WaitPolicy {
            interval: Duration::from_secs(10),
            max_attempts: 5,
        }
    }

    async fn pending_member(session: &FakeSession) -> PoolMember {
        let pool = session.pools().remove(0);
        session
            .create_member(&pool, &device("bigip1").reference)
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn licensed_ends_wait() {
        let session = FakeSession::new()
            .with_pool("prod-pool")
            .with_script([MemberState::Pending, MemberState::Licensed]);
        let member = pending_member(&session).await;

        let start = Instant::now();
        let licensed = wait_for_license(&session, &member, &policy()).await.unwrap();

        assert_eq!(licensed.state, MemberState::Licensed);
        assert_eq!(session.refresh_count(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_on_third_poll_stops_polling() {
        let session = FakeSession::new().with_pool("prod-pool").with_script([
            MemberState::Pending,
            MemberState::Installing,
            MemberState::Failed,
            MemberState::Licensed,
        ]);
        let member = pending_member(&session).await;

        let err = wait_for_license(&session, &member, &policy())
            .await
            .unwrap_err();

        assert_eq!(session.refresh_count(), 3);
        match err {
            CoreError::LicensingFailed { details, .. } => {
                assert_eq!(details, "license activation refused");
            }
            other => panic!("expected LicensingFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_is_timeout() {
        let session = FakeSession::new()
            .with_pool("prod-pool")
            .with_script([MemberState::Pending; 10]);
        let member = pending_member(&session).await;

        let start = Instant::now();
        let err = wait_for_license(&session, &member, &policy())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::LicensingTimeout { attempts: 5, .. }));
        assert_eq!(session.refresh_count(), 5);
        assert_eq!(start.elapsed(), policy().budget());
    }

    #[test]
    fn default_budget_is_half_an_hour() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.max_attempts, 180);
        assert_eq!(policy.budget(), Duration::from_secs(10 * 179));
    }
}
