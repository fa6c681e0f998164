//! Turn-count pacing.
//!
//! The story is paced by how many transcript entries exist before the current
//! exchange. Each phase layers one directive onto the system instruction and
//! decides whether the model may end the story.

use serde::Serialize;

/// Pacing regime for a continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Flirtation and tension only.
    Buildup,
    /// Physical contact escalates.
    Intensify,
    /// Peak of the emotional and physical arc.
    Climax,
    /// The story may conclude.
    Resolution,
}

impl Phase {
    /// Lower-case name used in logs and views.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Buildup => "buildup",
            Self::Intensify => "intensify",
            Self::Climax => "climax",
            Self::Resolution => "resolution",
        }
    }

    /// Heading used in the prompt.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Buildup => "BUILDUP",
            Self::Intensify => "INTENSIFY",
            Self::Climax => "EMOTIONAL AND PHYSICAL CLIMAX",
            Self::Resolution => "RESOLUTION",
        }
    }
}

/// One row of the pacing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseRule {
    /// First turn count this rule applies to.
    pub min_turn: usize,
    /// The phase selected.
    pub phase: Phase,
    /// Instruction layered onto the request.
    pub directive: &'static str,
    /// Whether the segment must not end the story.
    pub forces_non_ending: bool,
}

/// Pacing table ordered by `min_turn`.
pub static PHASE_TABLE: [PhaseRule; 4] = [
    PhaseRule {
        min_turn: 0,
        phase: Phase::Buildup,
        directive: "Raise the tension and the flirting: lingering kisses, caresses, words \
                    whispered close to the ear. Do not rush toward the final act; keep the \
                    desire burning.",
        forces_non_ending: true,
    },
    PhaseRule {
        min_turn: 6,
        phase: Phase::Intensify,
        directive: "Physical contact escalates. Clothing starts to get in the way and skin \
                    meets skin. Keep the language intimate and warm, centred on the pleasure \
                    of touching and being touched.",
        forces_non_ending: true,
    },
    PhaseRule {
        min_turn: 14,
        phase: Phase::Climax,
        directive: "The moment of greatest union. Describe passion overflowing, how the two \
                    move together, the pleasure they share. Prefer elegant euphemism so the \
                    narrative keeps flowing.",
        forces_non_ending: true,
    },
    PhaseRule {
        min_turn: 25,
        phase: Phase::Resolution,
        directive: "Bring the story to a satisfying, romantic and intense conclusion. If you \
                    decide to end it, set 'isEnding' to true.",
        forces_non_ending: false,
    },
];

/// Selects the pacing rule for a turn count.
#[must_use]
pub fn rule_for_turn(turn: usize) -> &'static PhaseRule {
    PHASE_TABLE
        .iter()
        .rev()
        .find(|rule| turn >= rule.min_turn)
        .unwrap_or(&PHASE_TABLE[0])
}
