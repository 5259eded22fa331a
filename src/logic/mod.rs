//! View logic: snapshot reconciliation, auto-advance, score editing, polling.

pub mod auto_advance;
pub mod poll;
pub mod reconcile;
pub mod score_edit;

pub use auto_advance::{next_poule_tab, AutoAdvance, AUTO_ADVANCE_PERIOD};
pub use poll::{
    spawn_periodic, FirstTick, PollHandle, LIVE_SCOREBOARD_PERIOD, PUBLIC_VIEW_PERIOD,
    TABLET_STATUS_PERIOD,
};
pub use reconcile::{
    available_poules, has_knockout, initial_tab, MatchAnnotations, MatchView, ViewError, ViewState,
};
pub use score_edit::{
    parse_score_field, EditMode, EditSnapshot, Navigation, Referee, ScoreEditError,
    ScoreEditSession, SubmitOutcome,
};
