//! CSV roster import.
//!
//! Expected header:
//! `player_id,name,gender,serving,passing,blocking,hitting_spiking,defense_digging,athleticism`.
//! Empty rating cells count as the minimum rating; an empty gender is `Unknown`.

use crate::models::{Gender, Participant, PlayerId, SkillRatings, MIN_RATING};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

/// Errors that can occur while reading a roster.
#[derive(Debug)]
pub enum RosterError {
    /// Malformed CSV or a value of the wrong type.
    Csv(csv::Error),
    /// A row has no name.
    MissingName { player_id: PlayerId },
    /// The same player id appears twice.
    DuplicatePlayer(PlayerId),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Invalid roster: {}", e),
            RosterError::MissingName { player_id } => {
                write!(f, "Player {} has no name", player_id)
            }
            RosterError::DuplicatePlayer(id) => write!(f, "Player {} is listed twice", id),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    player_id: PlayerId,
    name: String,
    gender: Option<String>,
    serving: Option<u8>,
    passing: Option<u8>,
    blocking: Option<u8>,
    hitting_spiking: Option<u8>,
    defense_digging: Option<u8>,
    athleticism: Option<u8>,
}

impl RosterRecord {
    fn ratings(&self) -> SkillRatings {
        let r = |v: Option<u8>| v.unwrap_or(MIN_RATING);
        SkillRatings {
            serving: r(self.serving),
            passing: r(self.passing),
            blocking: r(self.blocking),
            hitting_spiking: r(self.hitting_spiking),
            defense_digging: r(self.defense_digging),
            athleticism: r(self.athleticism),
        }
    }
}

/// Read participants from CSV, in file order.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Participant>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut participants = Vec::new();
    for row in csv_reader.deserialize() {
        let record: RosterRecord = row?;
        if record.name.is_empty() {
            return Err(RosterError::MissingName {
                player_id: record.player_id,
            });
        }
        if !seen.insert(record.player_id) {
            return Err(RosterError::DuplicatePlayer(record.player_id));
        }
        let gender = record
            .gender
            .as_deref()
            .map(Gender::parse)
            .unwrap_or_default();
        participants.push(Participant::new(
            record.player_id,
            record.name.clone(),
            record.ratings().skills_score(),
            gender,
        ));
    }
    log::debug!("Read {} participant(s) from roster", participants.len());
    Ok(participants)
}
