//! Query handlers for the Story Progression context.
//!
//! Read-only views over the fixed story catalogs.

use nightfable_core::profile::THEMES;
use serde::Serialize;

use crate::domain::phase::{PHASE_TABLE, Phase};

/// One pacing phase as exposed to clients.
#[derive(Debug, Serialize)]
pub struct PhaseView {
    /// Phase name.
    pub phase: Phase,
    /// First turn count of the phase.
    pub min_turn: usize,
    /// Last turn count of the phase, `None` for the open-ended final phase.
    pub max_turn: Option<usize>,
    /// Whether segments in this phase may end the story.
    pub may_end: bool,
}

/// Returns the theme catalog in display order.
#[must_use]
pub fn list_themes() -> Vec<&'static str> {
    THEMES.to_vec()
}

/// Returns the pacing table as views.
#[must_use]
pub fn list_phases() -> Vec<PhaseView> {
    PHASE_TABLE
        .iter()
        .enumerate()
        .map(|(i, rule)| PhaseView {
            phase: rule.phase,
            min_turn: rule.min_turn,
            max_turn: PHASE_TABLE.get(i + 1).map(|next| next.min_turn - 1),
            may_end: !rule.forces_non_ending,
        })
        .collect()
}
