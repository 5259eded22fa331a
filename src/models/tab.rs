//! The client-local active tab: a poule number or the knockout sentinel `"ko"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const KNOCKOUT_SENTINEL: &str = "ko";

/// One selectable sub-view of a tournament.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTab", into = "RawTab")]
pub enum ViewTab {
    Poule(u32),
    Knockout,
}

/// Wire form: `2` or `"ko"` (numeric strings such as `"2"` are accepted too).
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTab {
    Number(u32),
    Text(String),
}

impl From<ViewTab> for RawTab {
    fn from(tab: ViewTab) -> Self {
        match tab {
            ViewTab::Poule(n) => RawTab::Number(n),
            ViewTab::Knockout => RawTab::Text(KNOCKOUT_SENTINEL.to_string()),
        }
    }
}

impl TryFrom<RawTab> for ViewTab {
    type Error = String;

    fn try_from(raw: RawTab) -> Result<Self, Self::Error> {
        match raw {
            RawTab::Number(n) => Ok(ViewTab::Poule(n)),
            RawTab::Text(s) => s.parse(),
        }
    }
}

impl FromStr for ViewTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(KNOCKOUT_SENTINEL) {
            return Ok(ViewTab::Knockout);
        }
        s.parse::<u32>()
            .map(ViewTab::Poule)
            .map_err(|_| format!("unknown tab `{}`", s))
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewTab::Poule(n) => write!(f, "{}", n),
            ViewTab::Knockout => f.write_str(KNOCKOUT_SENTINEL),
        }
    }
}
