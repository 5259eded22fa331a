//! Tablet standby: polls the status of the paired board and tells the tablet what to offer.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::gateway::{GatewayError, GatewayResult, Session, SessionError, StatusSource};
use crate::logic::{spawn_periodic, FirstTick, PollHandle};
use crate::models::{MatchId, ScorerSession, ScorerState, ScorerStatus};

/// What the standby screen offers next.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StandbyAction {
    /// A match is ready on this board.
    StartMatch(MatchId),
    /// Nothing to score; keep waiting.
    Wait,
}

struct Inner {
    source: Arc<dyn StatusSource>,
    scorer: ScorerSession,
    status: RwLock<Option<ScorerStatus>>,
    fetch_lock: tokio::sync::Mutex<()>,
    closed: AtomicBool,
}

impl Inner {
    async fn refresh(&self) -> GatewayResult<()> {
        let _fetching = self.fetch_lock.lock().await;
        let status = self.source.scorer_status(self.scorer).await?;
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }
        let mut slot = self.status.write().unwrap_or_else(|p| p.into_inner());
        if slot.as_ref().map(|s| (s.state, s.match_id)) != Some((status.state, status.match_id)) {
            log::info!(
                "Board {} is now {:?} (match {:?})",
                self.scorer.board_number,
                status.state,
                status.match_id
            );
        }
        *slot = Some(status);
        Ok(())
    }
}

/// Status poll for a paired tablet.
pub struct ScorerStandby {
    inner: Arc<Inner>,
    poll: Option<PollHandle>,
}

impl ScorerStandby {
    /// Start polling the board stored in `session`. Fails when the device is not paired.
    /// Must be called inside a Tokio runtime.
    pub fn mount(
        source: Arc<dyn StatusSource>,
        session: &Session,
        period: Duration,
    ) -> GatewayResult<Self> {
        let scorer = session.scorer().ok_or(GatewayError::NotPaired)?;
        let inner = Arc::new(Inner {
            source,
            scorer,
            status: RwLock::new(None),
            fetch_lock: tokio::sync::Mutex::new(()),
            closed: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        let poll = spawn_periodic("board status poll", period, FirstTick::Immediate, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return ControlFlow::Break(());
                };
                if let Err(e) = inner.refresh().await {
                    log::warn!("Board status poll failed: {}", e);
                }
                ControlFlow::Continue(())
            }
        });

        Ok(Self {
            inner,
            poll: Some(poll),
        })
    }

    pub fn scorer(&self) -> ScorerSession {
        self.inner.scorer
    }

    /// Last status received; None until the first successful poll.
    pub fn status(&self) -> Option<ScorerStatus> {
        self.inner
            .status
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn next_action(&self) -> StandbyAction {
        match self.status() {
            Some(ScorerStatus {
                state: ScorerState::ActiveMatch,
                match_id: Some(id),
                ..
            }) => StandbyAction::StartMatch(id),
            _ => StandbyAction::Wait,
        }
    }

    /// Only the most recently played match can be reopened for correction.
    pub fn correction_candidate(&self) -> Option<MatchId> {
        self.status()
            .and_then(|status| status.last_matches.first().map(|m| m.id))
    }

    pub async fn refresh_now(&self) -> GatewayResult<()> {
        self.inner.refresh().await
    }

    pub fn unmount(&mut self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.poll.take();
    }

    /// Stop polling and forget the pairing.
    pub fn unpair(mut self, session: &Session) -> Result<(), SessionError> {
        self.unmount();
        session.unpair()
    }
}

impl Drop for ScorerStandby {
    fn drop(&mut self) {
        self.unmount();
    }
}
