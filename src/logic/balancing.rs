//! Team balancing: place every participant into one of the sized team slots.

use crate::logic::ordering::{by_skill_desc, sort_by_skill};
use crate::models::{BalanceStrategy, Participant, Team, TeamError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Distribute participants over `team_sizes.len()` teams, balancing skill and gender.
///
/// 1. Split into women and everyone else (men and unknown gender together).
/// 2. Sort both groups by skill, highest first, ties by ascending player id.
/// 3. Women go round-robin from the first team: 0, 1, .., N-1, 0, ..
/// 4. Everyone else goes round-robin from the last team: N-1, .., 0, N-1, ..
/// 5. Each team is sorted by skill for display.
///
/// Placement is by team index, so `team_sizes` only fixes the number of teams. A team can end up
/// with more members than its nominal size; nobody is ever dropped.
pub fn distribute_players(
    participants: &[Participant],
    team_sizes: &[usize],
) -> Result<Vec<Team>, TeamError> {
    let mut teams = empty_teams(participants, team_sizes)?;
    let team_count = teams.len();
    if team_count == 0 {
        return Ok(teams);
    }

    let (mut females, mut others): (Vec<Participant>, Vec<Participant>) = participants
        .iter()
        .cloned()
        .partition(|p| p.gender.is_female());
    sort_by_skill(&mut females);
    sort_by_skill(&mut others);

    for (i, p) in females.into_iter().enumerate() {
        teams[i % team_count].push(p);
    }
    for (i, p) in others.into_iter().enumerate() {
        teams[(team_count - 1) - (i % team_count)].push(p);
    }

    log::debug!(
        "Distributed {} participant(s) over {} team(s) by gender round-robin",
        participants.len(),
        team_count
    );
    Ok(finish(teams))
}

/// Skill-only serpentine draft: 0, 1, .., N-1, N-1, .., 0, 0, 1, ..
pub fn distribute_snake(
    participants: &[Participant],
    team_sizes: &[usize],
) -> Result<Vec<Team>, TeamError> {
    let mut teams = empty_teams(participants, team_sizes)?;
    let team_count = teams.len();
    if team_count == 0 {
        return Ok(teams);
    }

    let mut sorted = participants.to_vec();
    sort_by_skill(&mut sorted);

    for (i, p) in sorted.into_iter().enumerate() {
        let round = i / team_count;
        let offset = i % team_count;
        let idx = if round % 2 == 0 {
            offset
        } else {
            team_count - 1 - offset
        };
        teams[idx].push(p);
    }
    Ok(finish(teams))
}

/// Skill-only, with variety between runs that is still reproducible.
///
/// Sorted participants are cut into tiers of one player per team. Each tier is shuffled with an
/// RNG seeded from `seed`, then tier position `j` goes to team `j`. The same seed and participant
/// set always give the same teams.
pub fn distribute_seeded_shuffle(
    participants: &[Participant],
    team_sizes: &[usize],
    seed: u64,
) -> Result<Vec<Team>, TeamError> {
    let mut teams = empty_teams(participants, team_sizes)?;
    let team_count = teams.len();
    if team_count == 0 {
        return Ok(teams);
    }

    let mut sorted = participants.to_vec();
    sort_by_skill(&mut sorted);

    let mut rng = StdRng::seed_from_u64(seed);
    for tier in sorted.chunks_mut(team_count) {
        tier.shuffle(&mut rng);
        for (j, p) in tier.iter().enumerate() {
            teams[j].push(p.clone());
        }
    }
    Ok(finish(teams))
}

/// Run the given strategy.
pub fn distribute_with(
    strategy: BalanceStrategy,
    participants: &[Participant],
    team_sizes: &[usize],
) -> Result<Vec<Team>, TeamError> {
    match strategy {
        BalanceStrategy::GenderRoundRobin => distribute_players(participants, team_sizes),
        BalanceStrategy::Snake => distribute_snake(participants, team_sizes),
        BalanceStrategy::SeededShuffle { seed } => {
            distribute_seeded_shuffle(participants, team_sizes, seed)
        }
    }
}

/// One empty team per slot. Fails only when there are people but no slots.
fn empty_teams(
    participants: &[Participant],
    team_sizes: &[usize],
) -> Result<Vec<Team>, TeamError> {
    if team_sizes.is_empty() && !participants.is_empty() {
        return Err(TeamError::NoTeamSlots {
            participants: participants.len(),
        });
    }
    Ok(team_sizes
        .iter()
        .map(|&size| Vec::with_capacity(size.min(participants.len())))
        .collect())
}

fn finish(mut teams: Vec<Team>) -> Vec<Team> {
    for team in &mut teams {
        team.sort_by(by_skill_desc);
    }
    teams
}
