//! Team logic: sizing, balancing, ordering and cached arrangements.

mod arrangement;
mod balancing;
mod generation;
mod ordering;
mod sizing;

pub use arrangement::{ArrangementCache, ArrangementKey};
pub use balancing::{
    distribute_players, distribute_seeded_shuffle, distribute_snake, distribute_with,
};
pub use generation::{generate_event_teams, generate_teams};
pub use ordering::{by_skill_desc, sort_by_skill};
pub use sizing::{calculate_team_sizes, TEAMS_PER_FIELD};
