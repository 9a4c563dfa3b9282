//! Single binary web server: JSON API for players, events, participation and generated teams.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, MAX_TEAM_SIZE (default for new events).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;
use volley_teams_web::{
    BalanceStrategy, Event, EventDetails, EventError, EventId, Gender, PlayerId, SkillRatings,
    Store, TeamSettings, TeamSummary, DEFAULT_MAX_TEAM_SIZE, MAX_TEAM_SIZE_LIMIT,
    RETAINED_EVENTS,
};

type AppState = Data<RwLock<Store>>;

/// Page size for the player list when the query gives none.
const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(serde::Serialize)]
struct TeamsResponse {
    event_id: EventId,
    participants: usize,
    teams: Vec<TeamSummary>,
}

#[derive(Deserialize)]
struct CreatePlayerBody {
    name: String,
    #[serde(default)]
    gender: Gender,
    skills: Option<SkillRatings>,
}

/// Query string for the player list (e.g. /api/players?search=ann&limit=20).
#[derive(Deserialize)]
struct PlayerListQuery {
    search: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

#[derive(Deserialize)]
struct SearchPlayersBody {
    terms: Vec<String>,
}

#[derive(Deserialize)]
struct CreateEventBody {
    name: String,
    #[serde(default)]
    location: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    fields_number: Option<usize>,
    max_team_size: Option<usize>,
    #[serde(default)]
    strategy: BalanceStrategy,
}

/// Path segment: player id (e.g. /api/players/{player_id})
#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

/// Path segment: event id (e.g. /api/events/{id})
#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

/// Path segments: event id and player id (e.g. /api/events/{id}/participants/{player_id})
#[derive(Deserialize)]
struct EventPlayerPath {
    id: EventId,
    player_id: PlayerId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn error_response(e: EventError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EventError::EventNotFound(_) | EventError::PlayerNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, EventError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "volley-teams-web",
    })
}

/// Register a player. Supplying skills marks them configured straight away.
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<CreatePlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.register_player(&body.name, body.gender, body.skills))
}

/// Players ordered by name, optionally filtered by name.
#[get("/api/players")]
async fn api_list_players(state: AppState, query: Query<PlayerListQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    HttpResponse::Ok().json(g.list_players(query.search.as_deref(), limit, query.offset))
}

/// Look players up by several terms at once; `#12` matches player 12.
#[post("/api/players/search")]
async fn api_search_players(state: AppState, body: Json<SearchPlayersBody>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.search_players(body.terms.as_slice()))
}

#[get("/api/players/{player_id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.player(path.player_id))
}

/// Set a player's skill ratings.
#[put("/api/players/{player_id}/skills")]
async fn api_set_player_skills(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<SkillRatings>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.set_player_skills(path.player_id, body.into_inner()))
}

/// Create an event (returns it with id).
#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<CreateEventBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut event = match Event::new(body.name, body.location, body.start_time, body.end_time) {
        Ok(e) => e,
        Err(e) => return error_response(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let settings = TeamSettings {
        fields_number: Some(body.fields_number),
        max_team_size: Some(body.max_team_size.unwrap_or(g.default_max_team_size())),
        strategy: Some(body.strategy),
    };
    if let Err(e) = event.apply_settings(&settings) {
        return error_response(e);
    }
    HttpResponse::Ok().json(g.create_event(event))
}

/// All events, latest start first.
#[get("/api/events")]
async fn api_list_events(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.events())
}

#[get("/api/events/upcoming")]
async fn api_upcoming_event(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.upcoming_event() {
        Some(e) => HttpResponse::Ok().json(e),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No events" })),
    }
}

#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.event(path.id))
}

/// Update name, location and/or times.
#[put("/api/events/{id}")]
async fn api_update_event(
    state: AppState,
    path: Path<EventPath>,
    body: Json<EventDetails>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.update_event_details(path.id, body.into_inner()))
}

/// Update courts, max team size and/or strategy. Keys left out keep their value.
#[put("/api/events/{id}/settings")]
async fn api_set_team_settings(
    state: AppState,
    path: Path<EventPath>,
    body: Json<TeamSettings>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.apply_team_settings(path.id, &body))
}

/// Join an event (player must have set their skills).
#[post("/api/events/{id}/participants/{player_id}")]
async fn api_join_event(state: AppState, path: Path<EventPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.join_event(path.id, path.player_id))
}

/// Withdraw from an event.
#[delete("/api/events/{id}/participants/{player_id}")]
async fn api_withdraw_from_event(state: AppState, path: Path<EventPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.withdraw_from_event(path.id, path.player_id))
}

/// Balanced teams for the event's active participants.
#[get("/api/events/{id}/teams")]
async fn api_get_teams(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.teams(path.id) {
        Ok(teams) => HttpResponse::Ok().json(TeamsResponse {
            event_id: path.id,
            participants: teams.iter().map(Vec::len).sum(),
            teams: teams.iter().map(|t| TeamSummary::from_team(t)).collect(),
        }),
        Err(e) => {
            log::warn!("No teams could be generated for event {}: {}", path.id, e);
            error_response(e)
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let max_team_size: usize = std::env::var("MAX_TEAM_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&s| s > 0 && s <= MAX_TEAM_SIZE_LIMIT)
        .unwrap_or(DEFAULT_MAX_TEAM_SIZE);
    let bind = (host.as_str(), port);
    log::info!(
        "Starting server at http://{}:{} (max team size {})",
        bind.0,
        bind.1,
        max_team_size
    );

    let state = Data::new(RwLock::new(Store::new(max_team_size)));

    // Background task: every hour, drop all but the most recent events
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let removed = g.retain_recent_events(RETAINED_EVENTS);
            if removed > 0 {
                log::info!("Cleaned up {} old event(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_player)
            .service(api_list_players)
            .service(api_search_players)
            .service(api_get_player)
            .service(api_set_player_skills)
            .service(api_create_event)
            .service(api_list_events)
            .service(api_upcoming_event)
            .service(api_get_event)
            .service(api_update_event)
            .service(api_set_team_settings)
            .service(api_join_event)
            .service(api_withdraw_from_event)
            .service(api_get_teams)
    })
    .bind(bind)?
    .run()
    .await
}
