//! Player and SkillRatings data structures.

use crate::models::participant::{Gender, Participant, PlayerId, MAX_RATING, MIN_RATING};
use serde::{Deserialize, Serialize};

fn min_rating() -> u8 {
    MIN_RATING
}

/// Self-reported ratings, one per category on a 1-5 scale.
/// Missing categories deserialize to the minimum rating.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SkillRatings {
    #[serde(default = "min_rating")]
    pub serving: u8,
    #[serde(default = "min_rating")]
    pub passing: u8,
    #[serde(default = "min_rating")]
    pub blocking: u8,
    #[serde(default = "min_rating")]
    pub hitting_spiking: u8,
    #[serde(default = "min_rating")]
    pub defense_digging: u8,
    #[serde(default = "min_rating")]
    pub athleticism: u8,
}

impl Default for SkillRatings {
    fn default() -> Self {
        Self::uniform(MIN_RATING)
    }
}

impl SkillRatings {
    /// Every category at the same rating.
    pub fn uniform(rating: u8) -> Self {
        Self {
            serving: rating,
            passing: rating,
            blocking: rating,
            hitting_spiking: rating,
            defense_digging: rating,
            athleticism: rating,
        }
    }

    /// Aggregate score used for balancing. Out-of-range ratings are clamped to 1..=5 first.
    pub fn skills_score(&self) -> u32 {
        [
            self.serving,
            self.passing,
            self.blocking,
            self.hitting_spiking,
            self.defense_digging,
            self.athleticism,
        ]
        .iter()
        .map(|r| u32::from((*r).clamp(MIN_RATING, MAX_RATING)))
        .sum()
    }
}

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub skills: SkillRatings,
    /// True once the player has filled in their skills. Unconfigured players cannot join events.
    pub configured: bool,
}

impl Player {
    /// Create an unconfigured player with floor ratings.
    pub fn new(id: PlayerId, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            skills: SkillRatings::default(),
            configured: false,
        }
    }

    /// Store the player's ratings and mark them configured.
    pub fn set_skills(&mut self, skills: SkillRatings) {
        self.skills = skills;
        self.configured = true;
    }

    /// Snapshot of this player as a balancing input.
    pub fn participant(&self) -> Participant {
        Participant::new(
            self.id,
            self.name.clone(),
            self.skills.skills_score(),
            self.gender,
        )
    }
}
