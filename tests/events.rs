//! Integration tests for events, participation and cached team arrangements.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use volley_teams_web::{
    balance_percentage, generate_event_teams, ArrangementCache, BalanceStrategy, Event,
    EventDetails, EventError, Gender, Participant, Player, PlayerId, SkillRatings, TeamError,
    TeamSettings, TeamSummary, MAX_FIELDS, MAX_SKILLS_SCORE, MAX_TEAM_SIZE_LIMIT,
    MIN_SKILLS_SCORE,
};

fn event() -> Event {
    let start = Utc::now();
    Event::new("Thursday volley", "Beach courts", start, start + Duration::hours(2)).unwrap()
}

fn configured(id: PlayerId, name: &str, gender: Gender, rating: u8) -> Player {
    let mut player = Player::new(id, name, gender);
    player.set_skills(SkillRatings::uniform(rating));
    player
}

fn registry(n: u32) -> HashMap<PlayerId, Player> {
    (1..=n)
        .map(|i| {
            let gender = if i % 3 == 0 { Gender::Female } else { Gender::Male };
            (i, configured(i, &format!("Player {i:02}"), gender, (i % 5 + 1) as u8))
        })
        .collect()
}

fn event_with_everyone(players: &HashMap<PlayerId, Player>) -> Event {
    let mut e = event();
    let mut ids: Vec<&PlayerId> = players.keys().collect();
    ids.sort();
    for id in ids {
        e.join(&players[id]).unwrap();
    }
    e
}

#[test]
fn new_event_rejects_bad_input() {
    let start = Utc::now();
    assert!(matches!(
        Event::new("   ", "", start, start),
        Err(EventError::EmptyName)
    ));
    assert!(matches!(
        Event::new("Game", "", start, start - Duration::minutes(1)),
        Err(EventError::EndsBeforeStart)
    ));
}

#[test]
fn unconfigured_player_cannot_join() {
    let mut e = event();
    let player = Player::new(1, "New", Gender::Female);
    assert_eq!(e.join(&player), Err(EventError::PlayerNotConfigured(1)));
    assert!(!e.is_participating(1));
}

#[test]
fn join_withdraw_and_rejoin() {
    let mut e = event();
    let player = configured(1, "Ana", Gender::Female, 3);
    e.join(&player).unwrap();
    assert_eq!(e.join(&player), Err(EventError::AlreadyParticipating(1)));

    e.withdraw(1).unwrap();
    assert!(!e.is_participating(1));
    assert!(e.participations[0].withdrew_at.is_some());
    assert_eq!(e.withdraw(1), Err(EventError::NotParticipating(1)));

    e.join(&player).unwrap();
    assert!(e.is_participating(1));
    assert_eq!(e.participations.len(), 1);
    assert!(e.participations[0].withdrew_at.is_none());
}

#[test]
fn active_participants_skip_withdrawn_and_sort_by_name() {
    let mut players = HashMap::new();
    players.insert(1, configured(1, "Zoe", Gender::Female, 4));
    players.insert(2, configured(2, "Bob", Gender::Male, 2));
    players.insert(3, configured(3, "Mia", Gender::Female, 5));
    let mut e = event();
    for id in [1, 2, 3] {
        e.join(&players[&id]).unwrap();
    }
    e.withdraw(3).unwrap();

    let active = e.active_participants(&players);
    let names: Vec<&str> = active.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Zoe"]);
    assert_eq!(active[1].skills_score, 24);
    assert_eq!(active[1].gender, Gender::Female);
}

#[test]
fn settings_are_validated() {
    let mut e = event();
    assert_eq!(
        e.set_max_team_size(0),
        Err(EventError::Team(TeamError::InvalidMaxTeamSize))
    );
    e.set_max_team_size(4).unwrap();
    assert_eq!(e.max_team_size, 4);
    e.set_fields_number(Some(0)).unwrap();
    assert_eq!(e.fields_number, None);
    e.set_fields_number(Some(3)).unwrap();
    assert_eq!(e.fields_number, Some(3));
}

#[test]
fn settings_are_bounded() {
    let mut e = event();
    assert_eq!(
        e.set_fields_number(Some(MAX_FIELDS + 1)),
        Err(EventError::Team(TeamError::TooManyTeams { requested: 202 }))
    );
    assert_eq!(e.fields_number, None);
    e.set_fields_number(Some(MAX_FIELDS)).unwrap();
    assert_eq!(e.fields_number, Some(MAX_FIELDS));

    assert_eq!(
        e.set_max_team_size(MAX_TEAM_SIZE_LIMIT + 1),
        Err(EventError::Team(TeamError::InvalidMaxTeamSize))
    );
    assert_eq!(
        e.set_max_team_size(usize::MAX),
        Err(EventError::Team(TeamError::InvalidMaxTeamSize))
    );
    e.set_max_team_size(MAX_TEAM_SIZE_LIMIT).unwrap();
    assert_eq!(e.max_team_size, MAX_TEAM_SIZE_LIMIT);
}

#[test]
fn partial_settings_keep_missing_keys() {
    let mut e = event();
    e.set_fields_number(Some(3)).unwrap();
    e.set_max_team_size(4).unwrap();

    let settings: TeamSettings =
        serde_json::from_str(r#"{"strategy": {"kind": "snake"}}"#).unwrap();
    assert_eq!(settings.fields_number, None);
    e.apply_settings(&settings).unwrap();
    assert_eq!(e.fields_number, Some(3));
    assert_eq!(e.max_team_size, 4);
    assert_eq!(e.strategy, BalanceStrategy::Snake);

    let settings: TeamSettings = serde_json::from_str(r#"{"max_team_size": 5}"#).unwrap();
    e.apply_settings(&settings).unwrap();
    assert_eq!(e.fields_number, Some(3));
    assert_eq!(e.max_team_size, 5);
}

#[test]
fn null_fields_number_goes_back_to_derived() {
    let mut e = event();
    e.set_fields_number(Some(3)).unwrap();
    let settings: TeamSettings = serde_json::from_str(r#"{"fields_number": null}"#).unwrap();
    assert_eq!(settings.fields_number, Some(None));
    e.apply_settings(&settings).unwrap();
    assert_eq!(e.fields_number, None);
}

#[test]
fn rejected_settings_change_nothing() {
    let mut e = event();
    e.set_fields_number(Some(2)).unwrap();
    let settings = TeamSettings {
        fields_number: Some(Some(1)),
        max_team_size: Some(0),
        strategy: Some(BalanceStrategy::Snake),
    };
    assert_eq!(
        e.apply_settings(&settings),
        Err(EventError::Team(TeamError::InvalidMaxTeamSize))
    );
    assert_eq!(e.fields_number, Some(2));
    assert_eq!(e.max_team_size, 6);
    assert_eq!(e.strategy, BalanceStrategy::GenderRoundRobin);
}

#[test]
fn details_update_only_given_keys() {
    let mut e = event();
    let start = e.start_time;
    let details: EventDetails =
        serde_json::from_str(r#"{"name": "  Friday volley ", "location": "Gym"}"#).unwrap();
    e.update_details(details).unwrap();
    assert_eq!(e.name, "Friday volley");
    assert_eq!(e.location, "Gym");
    assert_eq!(e.start_time, start);

    let later = EventDetails {
        start_time: Some(start + Duration::days(1)),
        end_time: Some(start + Duration::days(1) + Duration::hours(2)),
        ..EventDetails::default()
    };
    e.update_details(later).unwrap();
    assert_eq!(e.start_time, start + Duration::days(1));
    assert_eq!(e.name, "Friday volley");
}

#[test]
fn rejected_details_change_nothing() {
    let mut e = event();
    let (start, end) = (e.start_time, e.end_time);
    let bad = EventDetails {
        name: Some("Renamed".to_string()),
        end_time: Some(start - Duration::minutes(1)),
        ..EventDetails::default()
    };
    assert_eq!(e.update_details(bad), Err(EventError::EndsBeforeStart));
    assert_eq!(e.name, "Thursday volley");
    assert_eq!(e.end_time, end);

    let blank = EventDetails {
        name: Some("  ".to_string()),
        ..EventDetails::default()
    };
    assert_eq!(e.update_details(blank), Err(EventError::EmptyName));
}

#[test]
fn event_teams_follow_settings() {
    let players = registry(13);
    let mut e = event_with_everyone(&players);

    // Default max team size 6: 13 players need two fields, four teams.
    let teams = generate_event_teams(&e, &players).unwrap();
    assert_eq!(teams.len(), 4);
    assert_eq!(teams.iter().map(Vec::len).sum::<usize>(), 13);

    e.set_fields_number(Some(1)).unwrap();
    let teams = generate_event_teams(&e, &players).unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams.iter().map(Vec::len).sum::<usize>(), 13);
}

#[test]
fn empty_event_has_no_teams_unless_fields_are_set() {
    let players = registry(0);
    let mut e = event();
    assert!(generate_event_teams(&e, &players).unwrap().is_empty());
    e.set_fields_number(Some(1)).unwrap();
    let teams = generate_event_teams(&e, &players).unwrap();
    assert_eq!(teams.len(), 2);
    assert!(teams.iter().all(|t| t.is_empty()));
}

#[test]
fn cache_reuses_arrangement_until_membership_changes() {
    let players = registry(12);
    let mut e = event_with_everyone(&players);
    e.set_strategy(BalanceStrategy::SeededShuffle { seed: 5 });
    let mut cache = ArrangementCache::new();

    let participants = e.active_participants(&players);
    let first = cache.teams_for(&e, &participants).unwrap();
    assert_eq!(cache.len(), 1);

    // Same ids in another order hit the cache.
    let mut reordered = participants.clone();
    reordered.reverse();
    assert_eq!(cache.teams_for(&e, &reordered).unwrap(), first);

    e.withdraw(4).unwrap();
    let participants = e.active_participants(&players);
    let second = cache.teams_for(&e, &participants).unwrap();
    assert_eq!(second.iter().map(Vec::len).sum::<usize>(), 11);
    assert!(second.iter().flatten().all(|p| p.player_id != 4));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_ignores_score_changes_until_invalidated() {
    let mut players = registry(4);
    let e = event_with_everyone(&players);
    let mut cache = ArrangementCache::new();
    let before = cache.teams_for(&e, &e.active_participants(&players)).unwrap();

    players
        .get_mut(&1)
        .unwrap()
        .set_skills(SkillRatings::uniform(5));
    let participants = e.active_participants(&players);
    assert_eq!(cache.teams_for(&e, &participants).unwrap(), before);

    cache.invalidate(e.id);
    assert!(cache.is_empty());
    let after = cache.teams_for(&e, &participants).unwrap();
    let p1 = after
        .iter()
        .flatten()
        .find(|p| p.player_id == 1)
        .unwrap();
    assert_eq!(p1.skills_score, MAX_SKILLS_SCORE);
}

#[test]
fn cache_recomputes_when_settings_change() {
    let players = registry(12);
    let mut e = event_with_everyone(&players);
    let mut cache = ArrangementCache::new();
    let participants = e.active_participants(&players);

    assert_eq!(cache.teams_for(&e, &participants).unwrap().len(), 2);
    e.set_fields_number(Some(2)).unwrap();
    assert_eq!(cache.teams_for(&e, &participants).unwrap().len(), 4);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn skill_ratings_clamp_and_default() {
    let ratings = SkillRatings {
        serving: 0,
        passing: 9,
        ..SkillRatings::uniform(3)
    };
    assert_eq!(ratings.skills_score(), 1 + 5 + 3 * 4);
    assert_eq!(SkillRatings::default().skills_score(), MIN_SKILLS_SCORE);

    let partial: SkillRatings = serde_json::from_str(r#"{"serving": 4}"#).unwrap();
    assert_eq!(partial.skills_score(), 4 + 5);
}

#[test]
fn participant_defaults_missing_score_and_gender() {
    let p: Participant = serde_json::from_str(r#"{"player_id": 7, "name": "Kai"}"#).unwrap();
    assert_eq!(p.skills_score, MIN_SKILLS_SCORE);
    assert_eq!(p.gender, Gender::Unknown);
}

#[test]
fn participant_score_is_clamped_when_deserialized() {
    let high: Participant =
        serde_json::from_str(r#"{"player_id": 1, "name": "A", "skills_score": 99}"#).unwrap();
    assert_eq!(high.skills_score, MAX_SKILLS_SCORE);
    let low: Participant =
        serde_json::from_str(r#"{"player_id": 2, "name": "B", "skills_score": 0}"#).unwrap();
    assert_eq!(low.skills_score, MIN_SKILLS_SCORE);
    let ok: Participant =
        serde_json::from_str(r#"{"player_id": 3, "name": "C", "skills_score": 17}"#).unwrap();
    assert_eq!(ok.skills_score, 17);
}

#[test]
fn gender_parse_accepts_only_listed_spellings() {
    assert_eq!(Gender::parse(" Woman "), Gender::Female);
    assert_eq!(Gender::parse("F"), Gender::Female);
    assert_eq!(Gender::parse("man"), Gender::Male);
    assert_eq!(Gender::parse("w"), Gender::Unknown);
    assert_eq!(Gender::parse(""), Gender::Unknown);
}

#[test]
fn team_summary_reports_balance_percentage() {
    let team = vec![
        Participant::new(1, "A", 30, Gender::Male),
        Participant::new(2, "B", 15, Gender::Female),
    ];
    let summary = TeamSummary::from_team(&team);
    assert_eq!(summary.skills_total, 45);
    assert!((summary.balance_percentage - 75.0).abs() < 1e-9);
    assert_eq!(balance_percentage(&[]), 0.0);
}
