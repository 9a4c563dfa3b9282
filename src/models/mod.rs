//! Data structures for volleyball events: players, participants, events and teams.

mod event;
mod participant;
mod player;
mod team;

pub use event::{
    Event, EventDetails, EventError, EventId, Participation, TeamSettings, DEFAULT_MAX_TEAM_SIZE,
};
pub use participant::{
    Gender, Participant, PlayerId, MAX_RATING, MAX_SKILLS_SCORE, MIN_RATING, MIN_SKILLS_SCORE,
    SKILL_CATEGORIES,
};
pub use player::{Player, SkillRatings};
pub use team::{
    balance_percentage, skills_total, BalanceStrategy, Team, TeamError, TeamSummary, MAX_FIELDS,
    MAX_TEAM_SIZE_LIMIT,
};
