//! Team output type, per-team summary and the team generation error.

use crate::models::participant::{Participant, MAX_RATING, SKILL_CATEGORIES};
use serde::{Deserialize, Serialize};

/// One generated team, sorted by skill (highest first) for display.
pub type Team = Vec<Participant>;

/// How participants are spread over the team slots.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceStrategy {
    /// Women round-robin from the first team, everyone else from the last team.
    #[default]
    GenderRoundRobin,
    /// Skill-only serpentine draft, ignoring gender.
    Snake,
    /// Skill-only: rank tiers of one player per team, each tier shuffled with a fixed seed.
    SeededShuffle { seed: u64 },
}

/// Most courts a single event can use.
pub const MAX_FIELDS: usize = 100;
/// Largest per-team cap an event accepts.
pub const MAX_TEAM_SIZE_LIMIT: usize = 100;

/// Errors raised by team sizing and balancing. Both only reject malformed arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TeamError {
    /// Maximum team size must be at least 1 (and, for event settings, at most the limit).
    InvalidMaxTeamSize,
    /// The field count asks for more teams than `MAX_FIELDS` allows.
    TooManyTeams { requested: usize },
    /// Participants were given but there are no team slots to place them in.
    NoTeamSlots { participants: usize },
}

impl std::fmt::Display for TeamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamError::InvalidMaxTeamSize => write!(
                f,
                "Maximum team size must be between 1 and {}",
                MAX_TEAM_SIZE_LIMIT
            ),
            TeamError::TooManyTeams { requested } => write!(
                f,
                "{} teams requested, at most {} allowed",
                requested,
                MAX_FIELDS * 2
            ),
            TeamError::NoTeamSlots { participants } => {
                write!(f, "No teams to place {} participant(s) into", participants)
            }
        }
    }
}

impl std::error::Error for TeamError {}

/// Display view of a team: members plus the skill totals shown on team cards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamSummary {
    pub members: Team,
    pub skills_total: u32,
    /// Share of the best possible score for a team of this size, 0-100.
    pub balance_percentage: f64,
}

impl TeamSummary {
    pub fn from_team(team: &[Participant]) -> Self {
        Self {
            members: team.to_vec(),
            skills_total: skills_total(team),
            balance_percentage: balance_percentage(team),
        }
    }
}

/// Sum of skill scores in a team.
pub fn skills_total(team: &[Participant]) -> u32 {
    team.iter().map(|p| p.skills_score).sum()
}

/// `sum(skills) / (len * max rating * categories) * 100`; 0 for an empty team.
pub fn balance_percentage(team: &[Participant]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let max_total = team.len() as f64 * f64::from(MAX_RATING) * f64::from(SKILL_CATEGORIES);
    f64::from(skills_total(team)) / max_total * 100.0
}
