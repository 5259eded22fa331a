//! Remote Data Gateway: authenticated REST calls against the tournament API.

mod client;
mod error;
mod session;
mod source;

pub use client::{Gateway, PublicTournamentSource};
pub use error::{GatewayError, GatewayResult};
pub use session::{Session, SessionData, SessionError};
pub use source::{MatchSource, ScoreSink, ScoreUpdate, Snapshot, StatusSource, TournamentSource};
