//! Scorer tablet data: pairing session and board status.

use crate::models::game::MatchId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

/// Which board a paired tablet represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScorerSession {
    pub tournament_id: TournamentId,
    pub board_number: u32,
}

/// Board state reported by the server.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerState {
    /// A match is ready to be scored on this board.
    ActiveMatch,
    /// Nothing scheduled right now.
    #[default]
    Waiting,
    /// A state this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Compact match line shown in the tablet sidebar.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScorerMatchInfo {
    pub id: MatchId,
    pub player1_name: String,
    pub player2_name: String,
    pub score_p1: u32,
    pub score_p2: u32,
    #[serde(default)]
    pub referee_name: Option<String>,
    /// "Poule 1", "KO R2", ...
    pub round_str: String,
}

/// Response of `GET /scorer/status/{tournament}/{board}` and of the pairing call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScorerStatus {
    pub tournament_id: TournamentId,
    pub board_number: u32,
    #[serde(default)]
    pub match_id: Option<MatchId>,
    pub state: ScorerState,
    /// Most recent first.
    #[serde(default)]
    pub last_matches: Vec<ScorerMatchInfo>,
    #[serde(default)]
    pub next_matches: Vec<ScorerMatchInfo>,
}

impl ScorerStatus {
    pub fn session(&self) -> ScorerSession {
        ScorerSession {
            tournament_id: self.tournament_id,
            board_number: self.board_number,
        }
    }
}
