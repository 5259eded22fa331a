//! Score Edit Session: optimistic local editing of one match, submitted to the server.
//!
//! Local state is changed first and never rolled back on failure; the next poll is the final
//! arbiter. At most one submission per session is in flight. Edits made meanwhile are not sent
//! on their own: once the running submission succeeds, the latest local pair is sent if it
//! changed.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::gateway::{GatewayError, MatchSource, ScoreSink, ScoreUpdate};
use crate::models::{GameMatch, MatchId, PlayerId, ScorePair, Side};

/// Failures of an edit or a save.
#[derive(Debug, Error)]
pub enum ScoreEditError {
    /// The server refused or could not be reached. Displays the server's message verbatim.
    #[error(transparent)]
    Submit(#[from] GatewayError),
    /// Free-form input that is not a non-negative integer.
    #[error("invalid score `{0}`")]
    InvalidField(String),
    #[error("match {0} is not part of this view")]
    UnknownMatch(MatchId),
    /// The view was mounted without a score sink.
    #[error("this view is read-only")]
    ReadOnly,
    #[error("a save for match {0} is already in progress")]
    SaveInProgress(MatchId),
}

/// Parse a free-form score field. Empty input counts as zero.
pub fn parse_score_field(raw: &str) -> Result<u32, ScoreEditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ScoreEditError::InvalidField(raw.to_string()))
}

/// Who is editing: decides where to go after a confirmed result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditMode {
    Tablet,
    Admin,
}

/// Where the UI goes after a confirmed result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Navigation {
    /// Tablet: back to the board standby screen.
    Standby,
    /// Admin: back to the previous screen.
    Back,
}

impl EditMode {
    pub fn after_confirm(self) -> Navigation {
        match self {
            EditMode::Tablet => Navigation::Standby,
            EditMode::Admin => Navigation::Back,
        }
    }
}

/// Referee assigned with the score.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Referee {
    Player(PlayerId),
    Custom(String),
}

/// What happened to a submission request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// This pair was accepted by the server.
    Sent(ScorePair),
    /// Another submission is running; it will send the latest pair when it finishes.
    Queued,
    /// Nothing changed since the last accepted submission.
    Unchanged,
}

/// Read-only view of the session for rendering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EditSnapshot {
    pub scores: ScorePair,
    pub is_completed: bool,
    pub is_saving: bool,
    /// Local edits not yet accepted by the server.
    pub dirty: bool,
    pub referee: Option<Referee>,
}

#[derive(Debug)]
struct EditState {
    scores: ScorePair,
    is_completed: bool,
    is_saving: bool,
    referee: Option<Referee>,
    /// Bumped on every local change.
    revision: u64,
    /// Revision last accepted by the server.
    accepted: u64,
}

impl EditState {
    fn update(&self, is_completed: bool) -> ScoreUpdate {
        let mut update = ScoreUpdate::new(self.scores, is_completed);
        match &self.referee {
            Some(Referee::Player(id)) => update.referee_id = Some(*id),
            Some(Referee::Custom(name)) => update.custom_referee_name = Some(name.clone()),
            None => {}
        }
        update
    }
}

/// Edit session for a single match.
pub struct ScoreEditSession {
    sink: Arc<dyn ScoreSink>,
    match_id: MatchId,
    mode: EditMode,
    player1_name: String,
    player2_name: String,
    state: Mutex<EditState>,
    in_flight: tokio::sync::Mutex<()>,
}

impl ScoreEditSession {
    /// Load the match and start editing from its stored score.
    pub async fn open(
        source: &dyn MatchSource,
        sink: Arc<dyn ScoreSink>,
        match_id: MatchId,
        mode: EditMode,
    ) -> Result<Self, ScoreEditError> {
        let game = source.match_detail(match_id).await?;
        Ok(Self::from_match(sink, &game, mode))
    }

    pub fn from_match(sink: Arc<dyn ScoreSink>, game: &GameMatch, mode: EditMode) -> Self {
        let referee = game.referee_id.map(Referee::Player);
        Self {
            sink,
            match_id: game.id,
            mode,
            player1_name: game.player1_display().to_string(),
            player2_name: game.player2_display().to_string(),
            state: Mutex::new(EditState {
                scores: game.scores(),
                is_completed: game.is_completed,
                is_saving: false,
                referee,
                revision: 0,
                accepted: 0,
            }),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn player_names(&self) -> (&str, &str) {
        (&self.player1_name, &self.player2_name)
    }

    pub fn snapshot(&self) -> EditSnapshot {
        let state = self.lock();
        EditSnapshot {
            scores: state.scores,
            is_completed: state.is_completed,
            is_saving: state.is_saving,
            dirty: state.revision != state.accepted,
            referee: state.referee.clone(),
        }
    }

    pub fn scores(&self) -> ScorePair {
        self.lock().scores
    }

    /// +/- button: change locally, then submit the full pair as not completed.
    pub async fn adjust(&self, side: Side, delta: i32) -> Result<SubmitOutcome, ScoreEditError> {
        {
            let mut state = self.lock();
            state.scores.adjust(side, delta);
            state.revision += 1;
        }
        self.submit(false, false).await
    }

    /// Keystroke in a free-form field: local only, submitted by
    /// [`commit_field`](Self::commit_field).
    pub fn set_field(&self, side: Side, raw: &str) -> Result<ScorePair, ScoreEditError> {
        let value = parse_score_field(raw)?;
        let mut state = self.lock();
        state.scores.set(side, value);
        state.revision += 1;
        Ok(state.scores)
    }

    /// Field blur or Enter: submit the settled pair if it changed.
    pub async fn commit_field(&self) -> Result<SubmitOutcome, ScoreEditError> {
        {
            let state = self.lock();
            if state.revision == state.accepted {
                return Ok(SubmitOutcome::Unchanged);
            }
        }
        self.submit(false, false).await
    }

    /// Set or clear the referee; sent with the next submission.
    pub fn set_referee(&self, referee: Option<Referee>) {
        let mut state = self.lock();
        state.referee = referee;
        state.revision += 1;
    }

    /// "Confirm result": submit as completed. On success, tells the UI where to go.
    pub async fn confirm(&self) -> Result<Navigation, ScoreEditError> {
        self.submit(true, true).await?;
        log::info!("Result for match {} confirmed", self.match_id);
        Ok(self.mode.after_confirm())
    }

    /// Mark a completed match as in progress again (result correction).
    pub async fn reopen(&self) -> Result<SubmitOutcome, ScoreEditError> {
        self.submit(false, true).await
    }

    /// Send the current pair. `wait` blocks behind a running submission instead of queueing.
    async fn submit(
        &self,
        is_completed: bool,
        wait: bool,
    ) -> Result<SubmitOutcome, ScoreEditError> {
        let _slot = if wait {
            self.in_flight.lock().await
        } else {
            match self.in_flight.try_lock() {
                Ok(slot) => slot,
                Err(_) => {
                    log::debug!("Submission for match {} already running, queued", self.match_id);
                    return Ok(SubmitOutcome::Queued);
                }
            }
        };

        loop {
            let (update, revision) = {
                let mut state = self.lock();
                state.is_saving = true;
                (state.update(is_completed), state.revision)
            };

            let result = self.sink.submit_score(self.match_id, update.clone()).await;

            let mut state = self.lock();
            match result {
                Ok(_) => {
                    state.accepted = revision;
                    state.is_completed = is_completed;
                    if is_completed || state.revision == revision {
                        state.is_saving = false;
                        return Ok(SubmitOutcome::Sent(update.scores()));
                    }
                    log::debug!("Match {} changed while saving, sending latest", self.match_id);
                }
                Err(e) => {
                    state.is_saving = false;
                    log::warn!("Saving match {} failed: {}", self.match_id, e);
                    return Err(e.into());
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, EditState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
