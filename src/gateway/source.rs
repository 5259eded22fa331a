//! Async seams between the view logic and the remote API, so controllers can run against the
//! real [`Gateway`](crate::gateway::Gateway) or a scripted stand-in.

use crate::gateway::error::GatewayResult;
use crate::models::{
    GameMatch, MatchId, PlayerId, ScorePair, ScorerSession, ScorerStatus, Standings, Tournament,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// One poll result: the tournament with its matches plus the standings of every poule.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub tournament: Tournament,
    pub standings: Standings,
}

impl Snapshot {
    pub fn new(tournament: Tournament, standings: Standings) -> Self {
        Self {
            tournament,
            standings,
        }
    }
}

/// Body of `PUT /matches/{id}/score`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score_p1: u32,
    pub score_p2: u32,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referee_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_referee_name: Option<String>,
}

impl ScoreUpdate {
    pub fn new(scores: ScorePair, is_completed: bool) -> Self {
        Self {
            score_p1: scores.score_p1,
            score_p2: scores.score_p2,
            is_completed,
            referee_id: None,
            custom_referee_name: None,
        }
    }

    pub fn scores(&self) -> ScorePair {
        ScorePair::new(self.score_p1, self.score_p2)
    }
}

/// Where a live view gets its tournament + standings from.
pub trait TournamentSource: Send + Sync {
    fn fetch_snapshot(&self) -> BoxFuture<'static, GatewayResult<Snapshot>>;
}

/// Single-match lookup used to open an edit session.
pub trait MatchSource: Send + Sync {
    fn match_detail(&self, match_id: MatchId) -> BoxFuture<'static, GatewayResult<GameMatch>>;
}

/// Where score edits are written to.
pub trait ScoreSink: Send + Sync {
    fn submit_score(
        &self,
        match_id: MatchId,
        update: ScoreUpdate,
    ) -> BoxFuture<'static, GatewayResult<GameMatch>>;
}

/// Board status for a paired tablet.
pub trait StatusSource: Send + Sync {
    fn scorer_status(
        &self,
        scorer: ScorerSession,
    ) -> BoxFuture<'static, GatewayResult<ScorerStatus>>;
}
