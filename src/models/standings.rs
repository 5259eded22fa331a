//! Per-poule standings rows. Computed by the server; the client never derives them.

use crate::models::game::{GameMatch, PlayerId};
use crate::models::tournament::TournamentFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a poule table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsItem {
    pub id: PlayerId,
    pub name: String,
    pub points: i32,
    pub played: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
    pub leg_diff: i32,
    /// Tie that cannot be broken by the table; blocks knockout generation.
    #[serde(default)]
    pub needs_shootout: bool,
}

/// Poule number -> ordered rows. JSON object keys ("1", "2") decode into the poule number.
pub type Standings = BTreeMap<u32, Vec<StandingsItem>>;

/// True when any poule still has a tie that needs a shootout.
pub fn has_unresolved_ties(standings: &Standings) -> bool {
    standings
        .values()
        .any(|rows| rows.iter().any(|row| row.needs_shootout))
}

/// Whether the poule phase is finished and the bracket can be generated.
///
/// Only hybrid tournaments have a poule phase followed by a bracket. Requires at least one poule
/// match, every poule match completed, no bracket match yet and no unresolved ties.
pub fn can_start_knockout(
    format: TournamentFormat,
    matches: &[GameMatch],
    standings: &Standings,
) -> bool {
    if format != TournamentFormat::Hybrid {
        return false;
    }
    let mut poule_matches = matches.iter().filter(|m| !m.is_knockout()).peekable();
    if poule_matches.peek().is_none() {
        return false;
    }
    let all_poules_finished = poule_matches.all(|m| m.is_completed);
    let knockout_not_started = !matches.iter().any(GameMatch::is_knockout);
    all_poules_finished && knockout_not_started && !has_unresolved_ties(standings)
}
