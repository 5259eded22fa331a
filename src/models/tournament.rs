//! Tournament snapshot as served by the public endpoint.

use crate::models::game::GameMatch;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = i64;

/// Lifecycle of a tournament, owned by the server.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Active,
    Completed,
    /// A status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// How the tournament is played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    RoundRobin,
    Knockout,
    /// Poules first, then a knockout bracket for the qualifiers.
    Hybrid,
    /// A format this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// Read-only snapshot of a tournament with its matches. Replaced wholesale on every poll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(default)]
    pub format: TournamentFormat,
    /// Free-form date string as entered by the organizer.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Handle for spectators.
    #[serde(default)]
    pub public_uuid: Option<Uuid>,
    /// Handle for scorer tablets.
    #[serde(default)]
    pub scorer_uuid: Option<Uuid>,
    #[serde(default)]
    pub qualifiers_per_poule: Option<u32>,
    /// Ordered as the server sends them.
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

impl Tournament {
    /// Create an empty draft tournament (fixtures, placeholders).
    pub fn new(id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TournamentStatus::Draft,
            format: TournamentFormat::RoundRobin,
            date: None,
            created_at: None,
            public_uuid: None,
            scorer_uuid: None,
            qualifiers_per_poule: None,
            matches: Vec::new(),
        }
    }

    /// Same tournament with the given match list (builder style).
    pub fn with_matches(mut self, matches: Vec<GameMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn has_knockout(&self) -> bool {
        self.matches.iter().any(GameMatch::is_knockout)
    }
}
