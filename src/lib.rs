//! Dart tournament live view: polling client, view-state reconciliation, auto-advance,
//! optimistic score editing and tablet standby.

pub mod config;
pub mod gateway;
pub mod live_view;
pub mod logic;
pub mod models;
pub mod standby;

pub use config::{ViewKind, ViewerConfig};
pub use gateway::{
    Gateway, GatewayError, GatewayResult, MatchSource, PublicTournamentSource, ScoreSink,
    ScoreUpdate, Session, SessionError, Snapshot, StatusSource, TournamentSource,
};
pub use live_view::{LiveView, LiveViewConfig, SAVE_FLASH};
pub use logic::{
    available_poules, has_knockout, initial_tab, next_poule_tab, AutoAdvance, EditMode,
    EditSnapshot, MatchAnnotations, MatchView, Navigation, Referee, ScoreEditError,
    ScoreEditSession, SubmitOutcome, ViewError, ViewState,
};
pub use models::{
    can_start_knockout, has_unresolved_ties, GameMatch, MatchId, PlayerId, ScorePair,
    ScorerMatchInfo, ScorerSession, ScorerState, ScorerStatus, Side, Stage, Standings,
    StandingsItem, Tournament, TournamentFormat, TournamentId, TournamentStatus, ViewTab,
};
pub use standby::{ScorerStandby, StandbyAction};
