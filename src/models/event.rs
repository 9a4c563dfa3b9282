//! Event, Participation and EventError.

use crate::models::participant::{Participant, PlayerId};
use crate::models::player::Player;
use crate::models::team::{BalanceStrategy, TeamError, MAX_FIELDS, MAX_TEAM_SIZE_LIMIT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for an event.
pub type EventId = Uuid;

/// Default cap on players per team for new events.
pub const DEFAULT_MAX_TEAM_SIZE: usize = 6;

/// Errors that can occur during event operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventError {
    /// No event with this id.
    EventNotFound(EventId),
    /// No registered player with this id.
    PlayerNotFound(PlayerId),
    /// The player name is empty.
    EmptyPlayerName,
    /// The player has not filled in their skills yet.
    PlayerNotConfigured(PlayerId),
    /// The player is already an active participant.
    AlreadyParticipating(PlayerId),
    /// The player has no active participation in this event.
    NotParticipating(PlayerId),
    /// The event name is empty.
    EmptyName,
    /// End time is before start time.
    EndsBeforeStart,
    /// Team settings or generation rejected the input.
    Team(TeamError),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::EventNotFound(_) => write!(f, "Event not found"),
            EventError::PlayerNotFound(_) => write!(f, "Player not found"),
            EventError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            EventError::PlayerNotConfigured(_) => {
                write!(f, "Player must set their skills before joining an event")
            }
            EventError::AlreadyParticipating(_) => write!(f, "Player already joined this event"),
            EventError::NotParticipating(_) => {
                write!(f, "Player is not participating in this event")
            }
            EventError::EmptyName => write!(f, "Event name must not be empty"),
            EventError::EndsBeforeStart => write!(f, "Event must end after it starts"),
            EventError::Team(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EventError {}

impl From<TeamError> for EventError {
    fn from(e: TeamError) -> Self {
        EventError::Team(e)
    }
}

/// Keeps a key that is present but `null` apart from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Partial update of how teams are formed. Missing keys keep the current value;
/// `"fields_number": null` goes back to deriving the court count.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct TeamSettings {
    #[serde(default, deserialize_with = "present")]
    pub fields_number: Option<Option<usize>>,
    #[serde(default)]
    pub max_team_size: Option<usize>,
    #[serde(default)]
    pub strategy: Option<BalanceStrategy>,
}

/// Partial update of an event's name, place and times. Missing keys keep the current value.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct EventDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

fn check_fields_number(fields_number: Option<usize>) -> Result<Option<usize>, TeamError> {
    match fields_number {
        Some(f) if f > MAX_FIELDS => Err(TeamError::TooManyTeams {
            requested: f.saturating_mul(2),
        }),
        other => Ok(other.filter(|&f| f > 0)),
    }
}

fn check_max_team_size(max_team_size: usize) -> Result<usize, TeamError> {
    if max_team_size == 0 || max_team_size > MAX_TEAM_SIZE_LIMIT {
        return Err(TeamError::InvalidMaxTeamSize);
    }
    Ok(max_team_size)
}

/// A player's sign-up for an event. Withdrawing keeps the row with a timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub player_id: PlayerId,
    pub joined_at: DateTime<Utc>,
    /// Set when the player withdrew; cleared if they join again.
    pub withdrew_at: Option<DateTime<Utc>>,
}

impl Participation {
    pub fn is_active(&self) -> bool {
        self.withdrew_at.is_none()
    }
}

/// A recurring volleyball session: where, when, who, and how teams are formed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Courts available. None lets sizing pick the fewest fields that fit everyone.
    pub fields_number: Option<usize>,
    pub max_team_size: usize,
    #[serde(default)]
    pub strategy: BalanceStrategy,
    pub participations: Vec<Participation>,
}

impl Event {
    /// Create an event with no participants and default team settings.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, EventError> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        if end_time < start_time {
            return Err(EventError::EndsBeforeStart);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            location: location.into(),
            start_time,
            end_time,
            fields_number: None,
            max_team_size: DEFAULT_MAX_TEAM_SIZE,
            strategy: BalanceStrategy::default(),
            participations: Vec::new(),
        })
    }

    /// Join the event. Re-joining after a withdrawal reactivates the same participation.
    pub fn join(&mut self, player: &Player) -> Result<(), EventError> {
        if !player.configured {
            return Err(EventError::PlayerNotConfigured(player.id));
        }
        match self
            .participations
            .iter_mut()
            .find(|p| p.player_id == player.id)
        {
            Some(p) if p.is_active() => Err(EventError::AlreadyParticipating(player.id)),
            Some(p) => {
                p.withdrew_at = None;
                Ok(())
            }
            None => {
                self.participations.push(Participation {
                    player_id: player.id,
                    joined_at: Utc::now(),
                    withdrew_at: None,
                });
                Ok(())
            }
        }
    }

    /// Withdraw from the event (the participation is kept with a withdrawal time).
    pub fn withdraw(&mut self, player_id: PlayerId) -> Result<(), EventError> {
        let p = self
            .participations
            .iter_mut()
            .find(|p| p.player_id == player_id && p.is_active())
            .ok_or(EventError::NotParticipating(player_id))?;
        p.withdrew_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_participating(&self, player_id: PlayerId) -> bool {
        self.participations
            .iter()
            .any(|p| p.player_id == player_id && p.is_active())
    }

    /// Balancing inputs for everyone still signed up, ordered by name.
    /// Participations whose player is not in `players` are skipped.
    pub fn active_participants(&self, players: &HashMap<PlayerId, Player>) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self
            .participations
            .iter()
            .filter(|p| p.is_active())
            .filter_map(|p| players.get(&p.player_id))
            .map(Player::participant)
            .collect();
        participants.sort_by(|a, b| a.name.cmp(&b.name).then(a.player_id.cmp(&b.player_id)));
        participants
    }

    /// Set the number of courts. `None` or `Some(0)` means "derive from player count".
    /// More than `MAX_FIELDS` is rejected.
    pub fn set_fields_number(&mut self, fields_number: Option<usize>) -> Result<(), EventError> {
        self.fields_number = check_fields_number(fields_number)?;
        Ok(())
    }

    /// Accepts 1..=`MAX_TEAM_SIZE_LIMIT`.
    pub fn set_max_team_size(&mut self, max_team_size: usize) -> Result<(), EventError> {
        self.max_team_size = check_max_team_size(max_team_size)?;
        Ok(())
    }

    /// Apply the keys present in `settings`. Nothing changes if any value is rejected.
    pub fn apply_settings(&mut self, settings: &TeamSettings) -> Result<(), EventError> {
        let fields_number = match settings.fields_number {
            Some(f) => check_fields_number(f)?,
            None => self.fields_number,
        };
        let max_team_size = match settings.max_team_size {
            Some(m) => check_max_team_size(m)?,
            None => self.max_team_size,
        };
        self.fields_number = fields_number;
        self.max_team_size = max_team_size;
        if let Some(strategy) = settings.strategy {
            self.strategy = strategy;
        }
        Ok(())
    }

    /// Apply the keys present in `details`. Nothing changes if any value is rejected.
    pub fn update_details(&mut self, details: EventDetails) -> Result<(), EventError> {
        let name = match details.name {
            Some(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(EventError::EmptyName);
                }
                name.to_string()
            }
            None => self.name.clone(),
        };
        let start_time = details.start_time.unwrap_or(self.start_time);
        let end_time = details.end_time.unwrap_or(self.end_time);
        if end_time < start_time {
            return Err(EventError::EndsBeforeStart);
        }
        self.name = name;
        if let Some(location) = details.location {
            self.location = location;
        }
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    pub fn set_strategy(&mut self, strategy: BalanceStrategy) {
        self.strategy = strategy;
    }
}
