//! Volleyball event organizer: library with models and team balancing logic.

pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use logic::{
    by_skill_desc, calculate_team_sizes, distribute_players, distribute_seeded_shuffle,
    distribute_snake, distribute_with, generate_event_teams, generate_teams, sort_by_skill,
    ArrangementCache, ArrangementKey, TEAMS_PER_FIELD,
};
pub use models::{
    balance_percentage, skills_total, BalanceStrategy, Event, EventDetails, EventError, EventId,
    Gender, Participant, Participation, Player, PlayerId, SkillRatings, Team, TeamError,
    TeamSettings, TeamSummary, DEFAULT_MAX_TEAM_SIZE, MAX_FIELDS, MAX_RATING, MAX_SKILLS_SCORE,
    MAX_TEAM_SIZE_LIMIT, MIN_RATING, MIN_SKILLS_SCORE, SKILL_CATEGORIES,
};
pub use roster::{read_roster, RosterError};
pub use store::{PlayerPage, Store, RETAINED_EVENTS};
