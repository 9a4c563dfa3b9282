//! Team generation for an event: sizing plus balancing over its active participants.

use crate::logic::balancing::distribute_with;
use crate::logic::sizing::calculate_team_sizes;
use crate::models::{Event, Participant, Player, PlayerId, Team, TeamError};
use std::collections::HashMap;

/// Size and balance teams for `participants` using the event's settings.
pub fn generate_teams(event: &Event, participants: &[Participant]) -> Result<Vec<Team>, TeamError> {
    let sizes = calculate_team_sizes(participants.len(), event.max_team_size, event.fields_number)?;
    let teams = distribute_with(event.strategy, participants, &sizes)?;
    log::debug!(
        "Generated {} team(s) for event {} from {} participant(s)",
        teams.len(),
        event.id,
        participants.len()
    );
    Ok(teams)
}

/// Generate teams from everyone currently signed up for `event`.
pub fn generate_event_teams(
    event: &Event,
    players: &HashMap<PlayerId, Player>,
) -> Result<Vec<Team>, TeamError> {
    generate_teams(event, &event.active_participants(players))
}
