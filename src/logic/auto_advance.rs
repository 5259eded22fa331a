//! Auto-Advance ("TV mode"): cycles the active tab through the poules on a timer.

use crate::logic::reconcile::ViewState;
use crate::models::ViewTab;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time between two auto-advance steps.
pub const AUTO_ADVANCE_PERIOD: Duration = Duration::from_secs(10);

/// Two-state machine, switched only by the user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAdvance {
    #[default]
    Off,
    On,
}

impl AutoAdvance {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            AutoAdvance::On
        } else {
            AutoAdvance::Off
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AutoAdvance::Off => AutoAdvance::On,
            AutoAdvance::On => AutoAdvance::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == AutoAdvance::On
    }

    /// The timer runs only while on and no knockout match exists.
    pub fn is_armed(self, knockout_present: bool) -> bool {
        self.is_on() && !knockout_present
    }
}

/// Next poule after `current`, wrapping after the last. The index is taken modulo the current
/// poule count, so a poule set that changes between ticks may skip or repeat a poule.
/// A current tab outside the set restarts at the first poule.
pub fn next_poule_tab(current: Option<ViewTab>, poules: &[u32]) -> Option<ViewTab> {
    if poules.is_empty() {
        return None;
    }
    let position = match current {
        Some(ViewTab::Poule(n)) => poules.iter().position(|p| *p == n),
        _ => None,
    };
    let next = position.map_or(0, |i| (i + 1) % poules.len());
    Some(ViewTab::Poule(poules[next]))
}

/// One timer tick. Returns the new tab, or None when nothing moved.
pub fn tick(state: &mut ViewState, mode: AutoAdvance) -> Option<ViewTab> {
    if !mode.is_armed(state.has_knockout()) {
        return None;
    }
    let next = next_poule_tab(state.active_tab, &state.poules)?;
    state.active_tab = Some(next);
    Some(next)
}
