//! Team sizing: how many teams to form and how many players each one takes.

use crate::models::{TeamError, MAX_FIELDS};

/// Teams per field: each court hosts two opposing sides.
pub const TEAMS_PER_FIELD: usize = 2;

/// Compute team capacities for `total_players`.
///
/// 1. Field count is `fields_number` if given and non-zero, else the fewest fields that fit
///    everyone: `ceil(total_players / (max_team_size * 2))`.
/// 2. Team count is `fields * 2`.
/// 3. Every team gets `total_players / teams`; the first `total_players % teams` teams get one
///    more.
///
/// More than `MAX_FIELDS` fields, given or derived, is rejected with `TooManyTeams`.
///
/// With no players and no explicit field count this returns an empty list (zero fields). Callers
/// that want empty teams on an empty event must pass `fields_number`.
pub fn calculate_team_sizes(
    total_players: usize,
    max_team_size: usize,
    fields_number: Option<usize>,
) -> Result<Vec<usize>, TeamError> {
    if max_team_size == 0 {
        return Err(TeamError::InvalidMaxTeamSize);
    }

    let fields = match fields_number {
        Some(f) if f > 0 => f,
        // A field too large to count holds any number of players.
        _ => match max_team_size.checked_mul(TEAMS_PER_FIELD) {
            Some(per_field) => total_players.div_ceil(per_field),
            None => usize::from(total_players > 0),
        },
    };
    if fields > MAX_FIELDS {
        return Err(TeamError::TooManyTeams {
            requested: fields.saturating_mul(TEAMS_PER_FIELD),
        });
    }
    let team_count = fields * TEAMS_PER_FIELD;
    if team_count == 0 {
        return Ok(Vec::new());
    }

    let base = total_players / team_count;
    let remainder = total_players % team_count;

    let mut sizes = vec![base; team_count];
    for size in sizes.iter_mut().take(remainder) {
        *size += 1;
    }
    Ok(sizes)
}
