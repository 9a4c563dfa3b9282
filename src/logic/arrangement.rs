//! Memoised team arrangements per event.
//!
//! Teams are recomputed only when the event's team settings or its set of participant ids change,
//! so players see the same teams on every page load. Score changes do not alter the key; callers
//! that edit skills should `invalidate` or `clear`.

use crate::logic::generation::generate_teams;
use crate::models::{BalanceStrategy, Event, EventId, Participant, PlayerId, Team, TeamError};
use std::collections::HashMap;

/// What an arrangement was computed from.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ArrangementKey {
    pub fields_number: Option<usize>,
    pub max_team_size: usize,
    pub strategy: BalanceStrategy,
    /// Sorted, deduplicated.
    pub participant_ids: Vec<PlayerId>,
}

impl ArrangementKey {
    pub fn new(event: &Event, participants: &[Participant]) -> Self {
        let mut participant_ids: Vec<PlayerId> =
            participants.iter().map(|p| p.player_id).collect();
        participant_ids.sort_unstable();
        participant_ids.dedup();
        Self {
            fields_number: event.fields_number,
            max_team_size: event.max_team_size,
            strategy: event.strategy,
            participant_ids,
        }
    }
}

#[derive(Clone, Debug)]
struct CachedArrangement {
    key: ArrangementKey,
    teams: Vec<Team>,
}

/// Last computed arrangement per event. Not synchronised: keep it behind the same write lock as
/// the events it describes.
#[derive(Clone, Debug, Default)]
pub struct ArrangementCache {
    entries: HashMap<EventId, CachedArrangement>,
}

impl ArrangementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teams for `event` and `participants`, reusing the stored arrangement when the key matches.
    pub fn teams_for(
        &mut self,
        event: &Event,
        participants: &[Participant],
    ) -> Result<Vec<Team>, TeamError> {
        let key = ArrangementKey::new(event, participants);
        if let Some(cached) = self.entries.get(&event.id) {
            if cached.key == key {
                log::debug!("Reusing team arrangement for event {}", event.id);
                return Ok(cached.teams.clone());
            }
        }

        log::debug!("Recomputing team arrangement for event {}", event.id);
        let teams = generate_teams(event, participants)?;
        self.entries.insert(
            event.id,
            CachedArrangement {
                key,
                teams: teams.clone(),
            },
        );
        Ok(teams)
    }

    /// Drop the stored arrangement for one event.
    pub fn invalidate(&mut self, event_id: EventId) {
        self.entries.remove(&event_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
