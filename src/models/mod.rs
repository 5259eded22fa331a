//! Data structures served by the tournament API: tournaments, matches, standings, scorer status.

mod game;
mod scorer;
mod standings;
mod tab;
mod tournament;

pub use game::{GameMatch, MatchId, PlayerId, ScorePair, Side, Stage, BYE};
pub use scorer::{ScorerMatchInfo, ScorerSession, ScorerState, ScorerStatus};
pub use standings::{can_start_knockout, has_unresolved_ties, Standings, StandingsItem};
pub use tab::ViewTab;
pub use tournament::{Tournament, TournamentFormat, TournamentId, TournamentStatus};
