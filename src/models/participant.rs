//! Participant and Gender: the read-only input records for team balancing.

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a player (stable tie-break key when sorting by skill).
pub type PlayerId = u32;

/// Lowest rating in a single skill category.
pub const MIN_RATING: u8 = 1;
/// Highest rating in a single skill category.
pub const MAX_RATING: u8 = 5;
/// Number of rated skill categories that make up a skills score.
pub const SKILL_CATEGORIES: u32 = 6;
/// Floor score: every category at the minimum rating.
pub const MIN_SKILLS_SCORE: u32 = MIN_RATING as u32 * SKILL_CATEGORIES;
/// Ceiling score: every category at the maximum rating.
pub const MAX_SKILLS_SCORE: u32 = MAX_RATING as u32 * SKILL_CATEGORIES;

/// Gender used for balancing. `Unknown` is grouped with `Male` when teams are built.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Lenient parse for free-form input (CSV rosters, forms). Anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "female" | "f" | "woman" => Gender::Female,
            "male" | "m" | "man" => Gender::Male,
            _ => Gender::Unknown,
        }
    }

    pub fn is_female(self) -> bool {
        self == Gender::Female
    }
}

fn default_skills_score() -> u32 {
    MIN_SKILLS_SCORE
}

/// Scores from outside the 6..=30 range are pulled back into it.
fn clamped_skills_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let score = u32::deserialize(deserializer)?;
    Ok(score.clamp(MIN_SKILLS_SCORE, MAX_SKILLS_SCORE))
}

/// A player taking part in one event, as handed to the balancer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: PlayerId,
    /// Display only; never used for balancing.
    pub name: String,
    /// Sum of the player's category ratings. Missing scores count as the floor and
    /// deserialized scores are clamped to the valid range. `new` takes the score as given.
    #[serde(
        default = "default_skills_score",
        deserialize_with = "clamped_skills_score"
    )]
    pub skills_score: u32,
    #[serde(default)]
    pub gender: Gender,
}

impl Participant {
    pub fn new(
        player_id: PlayerId,
        name: impl Into<String>,
        skills_score: u32,
        gender: Gender,
    ) -> Self {
        Self {
            player_id,
            name: name.into(),
            skills_score,
            gender,
        }
    }
}
