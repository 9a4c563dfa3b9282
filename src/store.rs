//! In-memory store: registered players, events and their last team arrangement.

use crate::logic::ArrangementCache;
use crate::models::{
    Event, EventDetails, EventError, EventId, Gender, Player, PlayerId, SkillRatings, Team,
    TeamSettings,
};
use serde::Serialize;
use std::collections::HashMap;

/// Events kept by the periodic cleanup.
pub const RETAINED_EVENTS: usize = 2;

/// One page of the player list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerPage {
    pub players: Vec<Player>,
    /// Number of matching players before paging.
    pub total: usize,
}

/// All state behind the web API. Not synchronised; callers hold it behind a lock.
#[derive(Debug)]
pub struct Store {
    players: HashMap<PlayerId, Player>,
    next_player_id: PlayerId,
    events: HashMap<EventId, Event>,
    arrangements: ArrangementCache,
    default_max_team_size: usize,
}

fn by_name(a: &Player, b: &Player) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then(a.id.cmp(&b.id))
}

/// `#12` (anywhere in the term) searches by id.
fn id_term(term: &str) -> Option<PlayerId> {
    let (_, rest) = term.split_once('#')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

impl Store {
    pub fn new(default_max_team_size: usize) -> Self {
        Self {
            players: HashMap::new(),
            next_player_id: 1,
            events: HashMap::new(),
            arrangements: ArrangementCache::new(),
            default_max_team_size,
        }
    }

    pub fn default_max_team_size(&self) -> usize {
        self.default_max_team_size
    }

    /// Register a player with the next free id. Supplying skills marks them configured.
    pub fn register_player(
        &mut self,
        name: &str,
        gender: Gender,
        skills: Option<SkillRatings>,
    ) -> Result<&Player, EventError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventError::EmptyPlayerName);
        }
        let id = self.next_player_id;
        self.next_player_id += 1;
        let mut player = Player::new(id, name, gender);
        if let Some(skills) = skills {
            player.set_skills(skills);
        }
        log::info!("Registered player {} ({})", player.name, id);
        Ok(self.players.entry(id).or_insert(player))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, EventError> {
        self.players.get(&id).ok_or(EventError::PlayerNotFound(id))
    }

    /// Set a player's ratings. Every cached arrangement is dropped since scores changed.
    pub fn set_player_skills(
        &mut self,
        id: PlayerId,
        skills: SkillRatings,
    ) -> Result<&Player, EventError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(EventError::PlayerNotFound(id))?;
        player.set_skills(skills);
        self.arrangements.clear();
        Ok(player)
    }

    /// Players ordered by name, optionally filtered by a case-insensitive name fragment.
    pub fn list_players(&self, search: Option<&str>, limit: usize, offset: usize) -> PlayerPage {
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut matching: Vec<&Player> = self
            .players
            .values()
            .filter(|p| match &needle {
                Some(n) => p.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| by_name(a, b));
        PlayerPage {
            total: matching.len(),
            players: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        }
    }

    /// Players matching any term: `#<id>` matches by id, anything else by name fragment.
    /// Blank terms are ignored; results are ordered by name without duplicates.
    pub fn search_players<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Player> {
        let mut ids = Vec::new();
        let mut fragments = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            match id_term(term) {
                Some(id) => ids.push(id),
                None => fragments.push(term.to_lowercase()),
            }
        }
        let mut found: Vec<Player> = self
            .players
            .values()
            .filter(|p| {
                ids.contains(&p.id) || {
                    let name = p.name.to_lowercase();
                    fragments.iter().any(|f| name.contains(f.as_str()))
                }
            })
            .cloned()
            .collect();
        found.sort_by(by_name);
        found
    }

    pub fn create_event(&mut self, event: Event) -> &Event {
        log::info!("Created event {} ({})", event.name, event.id);
        let id = event.id;
        self.events.entry(id).or_insert(event)
    }

    pub fn event(&self, id: EventId) -> Result<&Event, EventError> {
        self.events.get(&id).ok_or(EventError::EventNotFound(id))
    }

    /// All events, latest start first.
    pub fn events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(a.id.cmp(&b.id)));
        events
    }

    /// The event with the latest start time.
    pub fn upcoming_event(&self) -> Option<&Event> {
        self.events().into_iter().next()
    }

    pub fn update_event_details(
        &mut self,
        id: EventId,
        details: EventDetails,
    ) -> Result<&Event, EventError> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or(EventError::EventNotFound(id))?;
        event.update_details(details)?;
        Ok(event)
    }

    pub fn apply_team_settings(
        &mut self,
        id: EventId,
        settings: &TeamSettings,
    ) -> Result<&Event, EventError> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or(EventError::EventNotFound(id))?;
        event.apply_settings(settings)?;
        Ok(event)
    }

    pub fn join_event(
        &mut self,
        event_id: EventId,
        player_id: PlayerId,
    ) -> Result<&Event, EventError> {
        let player = self
            .players
            .get(&player_id)
            .ok_or(EventError::PlayerNotFound(player_id))?;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EventError::EventNotFound(event_id))?;
        event.join(player)?;
        log::info!("Player {} joined event {}", player_id, event_id);
        Ok(event)
    }

    pub fn withdraw_from_event(
        &mut self,
        event_id: EventId,
        player_id: PlayerId,
    ) -> Result<&Event, EventError> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EventError::EventNotFound(event_id))?;
        event.withdraw(player_id)?;
        log::info!("Player {} withdrew from event {}", player_id, event_id);
        Ok(event)
    }

    /// Balanced teams for the event's active participants, reused until the participant set or
    /// team settings change.
    pub fn teams(&mut self, event_id: EventId) -> Result<Vec<Team>, EventError> {
        let event = self
            .events
            .get(&event_id)
            .ok_or(EventError::EventNotFound(event_id))?;
        let participants = event.active_participants(&self.players);
        Ok(self.arrangements.teams_for(event, &participants)?)
    }

    /// Keep only the `keep` events with the latest start times. Returns how many were removed.
    pub fn retain_recent_events(&mut self, keep: usize) -> usize {
        let stale: Vec<EventId> = self.events().iter().skip(keep).map(|e| e.id).collect();
        for id in &stale {
            self.events.remove(id);
            self.arrangements.invalidate(*id);
        }
        stale.len()
    }
}
