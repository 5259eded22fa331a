//! Shared fixtures and scripted stand-ins for the remote API.

#![allow(dead_code)]

use dart_tournament_live::{
    GameMatch, GatewayError, GatewayResult, MatchId, MatchSource, ScoreSink, ScoreUpdate,
    ScorerSession, ScorerState, ScorerStatus, Snapshot, Standings, StandingsItem, StatusSource,
    Tournament, TournamentSource,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn poule_match(id: MatchId, poule: u32) -> GameMatch {
    GameMatch::new(id, 1, Some(poule)).with_players(format!("A{id}"), format!("B{id}"))
}

pub fn ko_match(id: MatchId, round: u32) -> GameMatch {
    GameMatch::new(id, round, None).with_players(format!("A{id}"), format!("B{id}"))
}

pub fn snapshot(matches: Vec<GameMatch>) -> Snapshot {
    Snapshot::new(
        Tournament::new(7, "Club Night").with_matches(matches),
        Standings::new(),
    )
}

pub fn standings_row(id: i64, name: &str, needs_shootout: bool) -> StandingsItem {
    StandingsItem {
        id,
        name: name.to_string(),
        needs_shootout,
        ..StandingsItem::default()
    }
}

pub fn service_down() -> GatewayError {
    GatewayError::Rejected {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: "service unavailable".to_string(),
    }
}

/// One scripted poll answer.
pub enum Step {
    Ok(Snapshot),
    Fail,
}

/// Answers polls from a script; once the script runs out it repeats the last good snapshot.
#[derive(Default)]
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Snapshot>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            ..Self::default()
        })
    }

    /// Every fetch takes `delay` before answering.
    pub fn slow(steps: Vec<Step>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> GatewayResult<Snapshot> {
        let step = self.steps.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match step {
            Some(Step::Ok(snapshot)) => {
                *last = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Step::Fail) => Err(service_down()),
            None => last.clone().ok_or_else(service_down),
        }
    }
}

impl TournamentSource for ScriptedSource {
    fn fetch_snapshot(&self) -> BoxFuture<'static, GatewayResult<Snapshot>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let result = self.next();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
        .boxed()
    }
}

/// Records every submission. Rejects with the queued details, accepts otherwise.
#[derive(Default)]
pub struct RecordingSink {
    submitted: Mutex<Vec<(MatchId, ScoreUpdate)>>,
    rejections: Mutex<VecDeque<String>>,
    /// Held by a test to keep submissions in flight.
    pub gate: Arc<tokio::sync::Mutex<()>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject_next(&self, detail: &str) {
        self.rejections.lock().unwrap().push_back(detail.to_string());
    }

    pub fn submitted(&self) -> Vec<(MatchId, ScoreUpdate)> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ScoreSink for RecordingSink {
    fn submit_score(
        &self,
        match_id: MatchId,
        update: ScoreUpdate,
    ) -> BoxFuture<'static, GatewayResult<GameMatch>> {
        self.submitted.lock().unwrap().push((match_id, update.clone()));
        let rejection = self.rejections.lock().unwrap().pop_front();
        let gate = self.gate.clone();
        async move {
            let _open = gate.lock().await;
            if let Some(detail) = rejection {
                return Err(GatewayError::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    detail,
                });
            }
            let mut saved = GameMatch::new(match_id, 1, Some(1));
            saved.score_p1 = update.score_p1;
            saved.score_p2 = update.score_p2;
            saved.is_completed = update.is_completed;
            Ok(saved)
        }
        .boxed()
    }
}

/// Serves one fixed match for edit sessions.
pub struct FixedMatch(pub GameMatch);

impl MatchSource for FixedMatch {
    fn match_detail(&self, match_id: MatchId) -> BoxFuture<'static, GatewayResult<GameMatch>> {
        let found = (self.0.id == match_id).then(|| self.0.clone());
        async move {
            found.ok_or(GatewayError::Rejected {
                status: StatusCode::NOT_FOUND,
                detail: "Match not found".to_string(),
            })
        }
        .boxed()
    }
}

/// Board status stand-in answering from a queue, repeating the last one.
#[derive(Default)]
pub struct ScriptedStatus {
    states: Mutex<VecDeque<ScorerStatus>>,
    last: Mutex<Option<ScorerStatus>>,
    calls: AtomicUsize,
}

impl ScriptedStatus {
    pub fn new(states: Vec<ScorerStatus>) -> Arc<Self> {
        Arc::new(Self {
            states: Mutex::new(states.into()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatusSource for ScriptedStatus {
    fn scorer_status(
        &self,
        scorer: ScorerSession,
    ) -> BoxFuture<'static, GatewayResult<ScorerStatus>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.states.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(status) = next {
            *last = Some(status);
        }
        let result = last
            .clone()
            .filter(|s| s.session() == scorer)
            .ok_or_else(service_down);
        async move { result }.boxed()
    }
}

pub fn board_status(state: ScorerState, match_id: Option<MatchId>) -> ScorerStatus {
    ScorerStatus {
        tournament_id: 7,
        board_number: 2,
        match_id,
        state,
        last_matches: Vec::new(),
        next_matches: Vec::new(),
    }
}

/// Let spawned tasks run (time is paused in these tests, so this is instant).
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
