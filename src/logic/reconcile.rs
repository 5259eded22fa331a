//! View-State Reconciler: merges each polled snapshot into the UI model.
//!
//! Two layers per match: the authoritative [`GameMatch`] (replaced on every poll) and the
//! client-only layer ([`MatchAnnotations`] plus an optional unconfirmed `local_score`), which is
//! carried forward by match id.

use crate::gateway::Snapshot;
use crate::models::{
    GameMatch, MatchId, ScorePair, Side, Standings, StandingsItem, Tournament, ViewTab,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors from explicit navigation in the view.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ViewError {
    /// The tab does not exist in the current snapshot.
    #[error("tab {0} is not available")]
    UnknownTab(ViewTab),
}

/// UI-only flags. Never sent to or received from the server.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchAnnotations {
    pub is_saving: bool,
    /// Short "saved" flash after a successful save.
    pub save_success: bool,
}

/// A match as the view renders it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub game: GameMatch,
    #[serde(flatten)]
    pub annotations: MatchAnnotations,
    /// Unconfirmed local edit. Wins over the polled score until a save succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_score: Option<ScorePair>,
}

impl MatchView {
    pub fn new(game: GameMatch) -> Self {
        Self {
            game,
            annotations: MatchAnnotations::default(),
            local_score: None,
        }
    }

    pub fn id(&self) -> MatchId {
        self.game.id
    }

    /// Score to show: the local edit if any, else the server's.
    pub fn displayed_score(&self) -> ScorePair {
        self.local_score.unwrap_or_else(|| self.game.scores())
    }

    /// Overwrite one side of the local edit (starting from the displayed score).
    pub fn edit_local(&mut self, side: Side, value: u32) -> ScorePair {
        let mut scores = self.displayed_score();
        scores.set(side, value);
        self.local_score = Some(scores);
        self.annotations.save_success = false;
        scores
    }
}

/// Distinct non-null poule numbers, ascending.
pub fn available_poules(matches: &[GameMatch]) -> Vec<u32> {
    matches
        .iter()
        .filter_map(|m| m.poule_number)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// True when any match belongs to the knockout bracket.
pub fn has_knockout(matches: &[GameMatch]) -> bool {
    matches.iter().any(GameMatch::is_knockout)
}

/// Tab to open on the first load: the bracket if it exists, else the lowest poule.
/// None for an empty match list.
pub fn initial_tab(matches: &[GameMatch]) -> Option<ViewTab> {
    if has_knockout(matches) {
        return Some(ViewTab::Knockout);
    }
    available_poules(matches).first().copied().map(ViewTab::Poule)
}

/// Everything a live view renders. Empty (neutral "loading" state) until the first snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ViewState {
    /// Tournament header; its `matches` are moved into [`ViewState::matches`].
    pub tournament: Option<Tournament>,
    pub matches: Vec<MatchView>,
    pub standings: Standings,
    pub poules: Vec<u32>,
    pub active_tab: Option<ViewTab>,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip)]
    tab_initialized: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fresh snapshot. Domain fields are replaced, client-only layers survive by match
    /// id, poules are recomputed, and the tab is set only by the first non-empty snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            mut tournament,
            standings,
        } = snapshot;
        let fresh = std::mem::take(&mut tournament.matches);

        let mut carried: HashMap<MatchId, (MatchAnnotations, Option<ScorePair>)> = self
            .matches
            .drain(..)
            .map(|view| (view.game.id, (view.annotations, view.local_score)))
            .collect();

        self.poules = available_poules(&fresh);
        if !self.tab_initialized {
            if let Some(tab) = initial_tab(&fresh) {
                log::debug!("Initial tab set to {}", tab);
                self.active_tab = Some(tab);
                self.tab_initialized = true;
            }
        }

        self.matches = fresh
            .into_iter()
            .map(|game| {
                let mut view = MatchView::new(game);
                if let Some((annotations, local_score)) = carried.remove(&view.game.id) {
                    view.annotations = annotations;
                    view.local_score = local_score;
                }
                view
            })
            .collect();
        self.standings = standings;
        self.tournament = Some(tournament);
        self.last_updated = Some(Utc::now());
    }

    /// Explicit user click on a tab.
    pub fn select_tab(&mut self, tab: ViewTab) -> Result<(), ViewError> {
        let exists = match tab {
            ViewTab::Knockout => self.has_knockout(),
            ViewTab::Poule(n) => self.poules.contains(&n),
        };
        if !exists {
            return Err(ViewError::UnknownTab(tab));
        }
        self.active_tab = Some(tab);
        self.tab_initialized = true;
        Ok(())
    }

    /// Whether the tab has been set (by the first load or by the user).
    pub fn tab_initialized(&self) -> bool {
        self.tab_initialized
    }

    /// No matches yet: render the neutral empty state.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn has_knockout(&self) -> bool {
        self.matches.iter().any(|m| m.game.is_knockout())
    }

    pub fn match_view(&self, id: MatchId) -> Option<&MatchView> {
        self.matches.iter().find(|m| m.game.id == id)
    }

    pub fn match_view_mut(&mut self, id: MatchId) -> Option<&mut MatchView> {
        self.matches.iter_mut().find(|m| m.game.id == id)
    }

    /// Matches shown under `tab`, in server order.
    pub fn matches_for_tab(&self, tab: ViewTab) -> Vec<&MatchView> {
        self.matches
            .iter()
            .filter(|m| match tab {
                ViewTab::Knockout => m.game.is_knockout(),
                ViewTab::Poule(n) => m.game.poule_number == Some(n),
            })
            .collect()
    }

    /// Matches under the active tab; empty while no tab is set.
    pub fn active_matches(&self) -> Vec<&MatchView> {
        self.active_tab
            .map(|tab| self.matches_for_tab(tab))
            .unwrap_or_default()
    }

    /// Standings rows for a poule tab. The bracket has no table.
    pub fn standings_for_tab(&self, tab: ViewTab) -> &[StandingsItem] {
        match tab {
            ViewTab::Poule(n) => self.standings.get(&n).map(Vec::as_slice).unwrap_or(&[]),
            ViewTab::Knockout => &[],
        }
    }
}
