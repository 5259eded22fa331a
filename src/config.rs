//! Runtime configuration read from the environment, with built-in defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::live_view::{LiveViewConfig, SAVE_FLASH};
use crate::logic::{
    AUTO_ADVANCE_PERIOD, LIVE_SCOREBOARD_PERIOD, PUBLIC_VIEW_PERIOD, TABLET_STATUS_PERIOD,
};

/// Which live view a display station runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ViewKind {
    /// Public spectator page (slow refresh).
    #[default]
    Public,
    /// Live scoreboard next to the boards (fast refresh).
    Scoreboard,
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(ViewKind::Public),
            "scoreboard" => Ok(ViewKind::Scoreboard),
            other => Err(format!("unknown view kind `{}`", other)),
        }
    }
}

/// Client configuration shared by every view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewerConfig {
    /// Base URL of the tournament API, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    /// Where the session (token, board pairing) is persisted.
    pub session_path: PathBuf,
    pub request_timeout: Duration,
    pub public_poll: Duration,
    pub scoreboard_poll: Duration,
    pub status_poll: Duration,
    pub auto_advance: Duration,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".dart-session.json")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            session_path: default_session_path(),
            request_timeout: default_request_timeout(),
            public_poll: PUBLIC_VIEW_PERIOD,
            scoreboard_poll: LIVE_SCOREBOARD_PERIOD,
            status_poll: TABLET_STATUS_PERIOD,
            auto_advance: AUTO_ADVANCE_PERIOD,
        }
    }
}

impl ViewerConfig {
    /// Read `DART_*` variables; anything missing or unparseable keeps its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("DART_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            session_path: env::var_os("DART_SESSION_PATH")
                .map(PathBuf::from)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.session_path),
            request_timeout: env_secs("DART_REQUEST_TIMEOUT_SECS", defaults.request_timeout),
            public_poll: env_secs("DART_PUBLIC_POLL_SECS", defaults.public_poll),
            scoreboard_poll: env_secs("DART_SCOREBOARD_POLL_SECS", defaults.scoreboard_poll),
            status_poll: env_secs("DART_STATUS_POLL_SECS", defaults.status_poll),
            auto_advance: env_secs("DART_AUTO_ADVANCE_SECS", defaults.auto_advance),
        }
    }

    /// Timer settings for a live view of the given kind.
    pub fn live_view(&self, kind: ViewKind) -> LiveViewConfig {
        let poll_period = match kind {
            ViewKind::Public => self.public_poll,
            ViewKind::Scoreboard => self.scoreboard_poll,
        };
        LiveViewConfig {
            poll_period,
            auto_advance_period: self.auto_advance,
            save_flash: SAVE_FLASH,
        }
    }
}

/// Whole seconds from `var`; zero, negative or garbage falls back to `default`.
fn env_secs(var: &str, default: Duration) -> Duration {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                log::warn!("Ignoring {}={:?}, using {:?}", var, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
