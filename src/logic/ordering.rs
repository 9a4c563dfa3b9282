//! Deterministic ordering of participants by skill.

use crate::models::Participant;
use std::cmp::Ordering;

/// Highest skills score first; equal scores by ascending player id.
pub fn by_skill_desc(a: &Participant, b: &Participant) -> Ordering {
    b.skills_score
        .cmp(&a.skills_score)
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Sort in place with [`by_skill_desc`]. The result does not depend on input order.
pub fn sort_by_skill(participants: &mut [Participant]) {
    participants.sort_by(by_skill_desc);
}
