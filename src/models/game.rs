//! Match (game) as served by the tournament API, plus the score pair and stage helpers.

use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = i64;

/// Unique identifier for a player (also used for referees).
pub type PlayerId = i64;

/// Name shown for an empty slot in the draw.
pub const BYE: &str = "Bye";

/// Which side of a match a score belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    P1,
    P2,
}

/// Stage a match belongs to. Derived from `poule_number`, never stored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Round-robin stage of the given poule.
    Poule(u32),
    /// Single-elimination bracket.
    Knockout,
}

/// Legs (or sets) won by each player.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub score_p1: u32,
    pub score_p2: u32,
}

impl ScorePair {
    pub fn new(score_p1: u32, score_p2: u32) -> Self {
        Self { score_p1, score_p2 }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::P1 => self.score_p1,
            Side::P2 => self.score_p2,
        }
    }

    pub fn set(&mut self, side: Side, value: u32) {
        match side {
            Side::P1 => self.score_p1 = value,
            Side::P2 => self.score_p2 = value,
        }
    }

    /// Apply a +/- delta to one side. Scores floor at zero.
    pub fn adjust(&mut self, side: Side, delta: i32) {
        let current = self.get(side);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u32)
        };
        self.set(side, next);
    }
}

/// A single match. `poule_number == None` means the match is part of the knockout bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub round_number: u32,
    #[serde(default)]
    pub poule_number: Option<u32>,
    /// None (or missing) renders as "Bye".
    #[serde(default)]
    pub player1_name: Option<String>,
    #[serde(default)]
    pub player2_name: Option<String>,
    pub score_p1: u32,
    pub score_p2: u32,
    pub is_completed: bool,
    #[serde(default)]
    pub referee_id: Option<PlayerId>,
    #[serde(default)]
    pub referee_name: Option<String>,
    #[serde(default)]
    pub best_of_legs: Option<u32>,
    #[serde(default)]
    pub board_number: Option<u32>,
}

impl GameMatch {
    /// A blank, uncompleted match: handy for building fixtures and placeholders.
    pub fn new(id: MatchId, round_number: u32, poule_number: Option<u32>) -> Self {
        Self {
            id,
            round_number,
            poule_number,
            player1_name: None,
            player2_name: None,
            score_p1: 0,
            score_p2: 0,
            is_completed: false,
            referee_id: None,
            referee_name: None,
            best_of_legs: None,
            board_number: None,
        }
    }

    /// Set both player names (builder style).
    pub fn with_players(mut self, p1: impl Into<String>, p2: impl Into<String>) -> Self {
        self.player1_name = Some(p1.into());
        self.player2_name = Some(p2.into());
        self
    }

    pub fn stage(&self) -> Stage {
        match self.poule_number {
            Some(n) => Stage::Poule(n),
            None => Stage::Knockout,
        }
    }

    pub fn is_knockout(&self) -> bool {
        self.poule_number.is_none()
    }

    pub fn scores(&self) -> ScorePair {
        ScorePair::new(self.score_p1, self.score_p2)
    }

    pub fn player1_display(&self) -> &str {
        self.player1_name.as_deref().unwrap_or(BYE)
    }

    pub fn player2_display(&self) -> &str {
        self.player2_name.as_deref().unwrap_or(BYE)
    }

    /// "Poule 2" for round-robin matches, "KO R3" for bracket matches.
    pub fn round_label(&self) -> String {
        match self.stage() {
            Stage::Poule(n) => format!("Poule {}", n),
            Stage::Knockout => format!("KO R{}", self.round_number),
        }
    }
}
