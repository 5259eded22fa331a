//! Tournament Live View Controller.
//!
//! Binds the data poll, the reconciled [`ViewState`], the auto-advance timer and in-list score
//! saving to one owner. Every timer is a task owned by the view; [`LiveView::unmount`] (or
//! dropping the view) cancels all of them, and results that arrive later are discarded.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::gateway::{GatewayResult, ScoreSink, ScoreUpdate, TournamentSource};
use crate::logic::{
    auto_advance, parse_score_field, spawn_periodic, AutoAdvance, FirstTick, PollHandle,
    ScoreEditError, ViewError, ViewState, AUTO_ADVANCE_PERIOD, LIVE_SCOREBOARD_PERIOD,
    PUBLIC_VIEW_PERIOD,
};
use crate::models::{GameMatch, MatchId, ScorePair, Side, ViewTab};

/// How long the "saved" flash stays on a match.
pub const SAVE_FLASH: Duration = Duration::from_secs(2);

/// Timer settings of one live view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LiveViewConfig {
    pub poll_period: Duration,
    pub auto_advance_period: Duration,
    pub save_flash: Duration,
}

impl LiveViewConfig {
    /// Public spectator page.
    pub fn public() -> Self {
        Self {
            poll_period: PUBLIC_VIEW_PERIOD,
            auto_advance_period: AUTO_ADVANCE_PERIOD,
            save_flash: SAVE_FLASH,
        }
    }

    /// Live scoreboard: same behavior, faster refresh.
    pub fn scoreboard() -> Self {
        Self {
            poll_period: LIVE_SCOREBOARD_PERIOD,
            ..Self::public()
        }
    }
}

impl Default for LiveViewConfig {
    fn default() -> Self {
        Self::public()
    }
}

struct Inner {
    source: Arc<dyn TournamentSource>,
    sink: Option<Arc<dyn ScoreSink>>,
    config: LiveViewConfig,
    state: RwLock<ViewState>,
    auto_advance: Mutex<AutoAdvance>,
    auto_task: Mutex<Option<PollHandle>>,
    flash_tasks: Mutex<HashMap<MatchId, JoinHandle<()>>>,
    /// Serializes fetches: at most one in flight for this view.
    fetch_lock: tokio::sync::Mutex<()>,
    closed: AtomicBool,
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Fetch one snapshot and merge it. Errors leave the previous snapshot in place.
    async fn refresh(self: &Arc<Self>) -> GatewayResult<()> {
        let _fetching = self.fetch_lock.lock().await;
        let snapshot = self.source.fetch_snapshot().await?;
        if self.is_closed() {
            log::debug!("Discarding snapshot that arrived after unmount");
            return Ok(());
        }
        self.write().apply_snapshot(snapshot);
        self.sync_auto_advance();
        Ok(())
    }

    /// Start or stop the auto-advance timer to match the current mode and snapshot.
    fn sync_auto_advance(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        let mode = *lock(&self.auto_advance);
        let knockout_present = self.read().has_knockout();
        let armed = mode.is_armed(knockout_present);

        let mut slot = lock(&self.auto_task);
        match (armed, slot.is_some()) {
            (true, false) => {
                let weak = Arc::downgrade(self);
                *slot = Some(spawn_periodic(
                    "auto-advance",
                    self.config.auto_advance_period,
                    FirstTick::AfterPeriod,
                    move || {
                        let weak = weak.clone();
                        async move {
                            match weak.upgrade() {
                                Some(inner) => {
                                    inner.auto_tick();
                                    ControlFlow::Continue(())
                                }
                                None => ControlFlow::Break(()),
                            }
                        }
                    },
                ));
            }
            (false, true) => {
                *slot = None;
                if knockout_present && mode.is_on() {
                    log::info!("Knockout phase present, auto-advance suspended");
                }
            }
            _ => {}
        }
    }

    fn auto_tick(&self) {
        let mode = *lock(&self.auto_advance);
        if let Some(tab) = auto_advance::tick(&mut self.write(), mode) {
            log::debug!("Auto-advance to tab {}", tab);
        }
    }

    fn schedule_flash_clear(self: &Arc<Self>, match_id: MatchId) {
        let weak = Arc::downgrade(self);
        let delay = self.config.save_flash;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                if let Some(view) = inner.write().match_view_mut(match_id) {
                    view.annotations.save_success = false;
                }
            }
        });
        let mut tasks = lock(&self.flash_tasks);
        tasks.retain(|_, task| !task.is_finished());
        if let Some(previous) = tasks.insert(match_id, task) {
            previous.abort();
        }
    }
}

/// A mounted tournament view. Must be created inside a Tokio runtime.
pub struct LiveView {
    inner: Arc<Inner>,
    poll: Mutex<Option<PollHandle>>,
}

impl LiveView {
    /// Read-only view: fetches immediately, then every `config.poll_period`.
    pub fn mount(source: Arc<dyn TournamentSource>, config: LiveViewConfig) -> Self {
        Self::start(source, None, config)
    }

    /// View that can also save scores edited in the match list.
    pub fn mount_editable(
        source: Arc<dyn TournamentSource>,
        sink: Arc<dyn ScoreSink>,
        config: LiveViewConfig,
    ) -> Self {
        Self::start(source, Some(sink), config)
    }

    fn start(
        source: Arc<dyn TournamentSource>,
        sink: Option<Arc<dyn ScoreSink>>,
        config: LiveViewConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            source,
            sink,
            config,
            state: RwLock::new(ViewState::new()),
            auto_advance: Mutex::new(AutoAdvance::Off),
            auto_task: Mutex::new(None),
            flash_tasks: Mutex::new(HashMap::new()),
            fetch_lock: tokio::sync::Mutex::new(()),
            closed: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        let poll = spawn_periodic(
            "tournament poll",
            config.poll_period,
            FirstTick::Immediate,
            move || {
                let weak = weak.clone();
                async move {
                    let Some(inner) = weak.upgrade() else {
                        return ControlFlow::Break(());
                    };
                    if let Err(e) = inner.refresh().await {
                        log::warn!("Background refresh failed, keeping last snapshot: {}", e);
                    }
                    ControlFlow::Continue(())
                }
            },
        );

        Self {
            inner,
            poll: Mutex::new(Some(poll)),
        }
    }

    pub fn config(&self) -> LiveViewConfig {
        self.inner.config
    }

    /// Copy of the current view model.
    pub fn view(&self) -> ViewState {
        self.inner.read().clone()
    }

    pub fn active_tab(&self) -> Option<ViewTab> {
        self.inner.read().active_tab
    }

    /// User click on a tab.
    pub fn select_tab(&self, tab: ViewTab) -> Result<(), ViewError> {
        self.inner.write().select_tab(tab)?;
        log::info!("Tab {} selected", tab);
        Ok(())
    }

    pub fn auto_advance(&self) -> AutoAdvance {
        *lock(&self.inner.auto_advance)
    }

    pub fn set_auto_advance(&self, enabled: bool) -> AutoAdvance {
        let mode = AutoAdvance::from_enabled(enabled);
        *lock(&self.inner.auto_advance) = mode;
        log::info!("Auto-advance {:?}", mode);
        self.inner.sync_auto_advance();
        mode
    }

    pub fn toggle_auto_advance(&self) -> AutoAdvance {
        let next = self.auto_advance().toggle();
        self.set_auto_advance(next.is_on())
    }

    /// Whether the auto-advance timer is currently scheduled.
    pub fn is_auto_advance_running(&self) -> bool {
        lock(&self.inner.auto_task).is_some()
    }

    /// Fetch right away, outside the poll schedule. Waits for a running poll fetch first.
    pub async fn refresh_now(&self) -> GatewayResult<()> {
        self.inner.refresh().await
    }

    /// Keystroke in a match's score field: local overlay only.
    pub fn edit_score(
        &self,
        match_id: MatchId,
        side: Side,
        raw: &str,
    ) -> Result<ScorePair, ScoreEditError> {
        let value = parse_score_field(raw)?;
        let mut state = self.inner.write();
        let view = state
            .match_view_mut(match_id)
            .ok_or(ScoreEditError::UnknownMatch(match_id))?;
        Ok(view.edit_local(side, value))
    }

    /// Save the displayed score of a match as its final result.
    ///
    /// On success the view is refreshed, and if the field was not edited again meanwhile the
    /// local overlay is dropped and the match flashes as saved. On failure the overlay stays so
    /// the user can retry.
    pub async fn save_match(&self, match_id: MatchId) -> Result<GameMatch, ScoreEditError> {
        let sink = self.inner.sink.clone().ok_or(ScoreEditError::ReadOnly)?;
        let update = {
            let mut state = self.inner.write();
            let view = state
                .match_view_mut(match_id)
                .ok_or(ScoreEditError::UnknownMatch(match_id))?;
            if view.annotations.is_saving {
                return Err(ScoreEditError::SaveInProgress(match_id));
            }
            view.annotations.is_saving = true;
            let mut update = ScoreUpdate::new(view.displayed_score(), true);
            update.referee_id = view.game.referee_id;
            update
        };
        let submitted = update.scores();

        let result = sink.submit_score(match_id, update).await;
        if self.inner.is_closed() {
            return result.map_err(ScoreEditError::from);
        }

        match result {
            Ok(saved) => {
                let mut settled = false;
                if let Some(view) = self.inner.write().match_view_mut(match_id) {
                    view.game = saved.clone();
                    view.annotations.is_saving = false;
                    // Input typed while the save was running is still unsaved.
                    settled = view.local_score.map_or(true, |local| local == submitted);
                    if settled {
                        view.local_score = None;
                        view.annotations.save_success = true;
                    }
                }
                log::info!(
                    "Match {} saved as {}-{}",
                    match_id,
                    saved.score_p1,
                    saved.score_p2
                );
                if settled {
                    self.inner.schedule_flash_clear(match_id);
                } else {
                    log::debug!("Match {} edited during save, keeping local score", match_id);
                }
                if let Err(e) = self.inner.refresh().await {
                    log::warn!("Refresh after save failed: {}", e);
                }
                Ok(saved)
            }
            Err(e) => {
                if let Some(view) = self.inner.write().match_view_mut(match_id) {
                    view.annotations.is_saving = false;
                }
                Err(e.into())
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.is_closed()
    }

    /// Cancel every timer of this view. Idempotent.
    pub fn unmount(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        lock(&self.poll).take();
        lock(&self.inner.auto_task).take();
        for (_, task) in lock(&self.inner.flash_tasks).drain() {
            task.abort();
        }
        log::debug!("Live view unmounted");
    }
}

impl Drop for LiveView {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
