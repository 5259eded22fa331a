//! Display station: hosts one live tournament view and serves its state as JSON for a kiosk
//! screen. Run with: cargo run --bin display
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Required: DART_PUBLIC_UUID (public handle of the tournament). Optional: DART_VIEW_KIND
//! (`public` or `scoreboard`) plus the DART_* client settings.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use dart_tournament_live::{
    Gateway, GatewayError, LiveView, MatchId, PublicTournamentSource, ScoreEditError, Session,
    Side, ViewKind, ViewTab, ViewerConfig,
};
use serde::Deserialize;
use std::io;
use std::sync::Arc;
use uuid::Uuid;

type AppState = Data<LiveView>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    mounted: bool,
}

#[derive(Deserialize)]
struct SelectTabBody {
    tab: ViewTab,
}

#[derive(Deserialize)]
struct AutoAdvanceBody {
    enabled: bool,
}

#[derive(Deserialize)]
struct EditScoreBody {
    side: Side,
    /// Raw field content; empty means 0.
    value: String,
}

/// Path segment: match id (e.g. /api/matches/{id}/save)
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[get("/api/health")]
async fn api_health(state: AppState) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-tournament-display",
        mounted: state.is_mounted(),
    })
}

/// Full view model. Before the first load this is the neutral empty state.
#[get("/api/view")]
async fn api_get_view(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.view())
}

#[put("/api/view/tab")]
async fn api_select_tab(state: AppState, body: Json<SelectTabBody>) -> HttpResponse {
    match state.select_tab(body.tab) {
        Ok(()) => HttpResponse::Ok().json(state.view()),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[put("/api/view/auto-advance")]
async fn api_set_auto_advance(state: AppState, body: Json<AutoAdvanceBody>) -> HttpResponse {
    let mode = state.set_auto_advance(body.enabled);
    HttpResponse::Ok().json(serde_json::json!({
        "auto_advance": mode,
        "running": state.is_auto_advance_running(),
    }))
}

/// Local edit of one score field; nothing is sent until the match is saved.
#[put("/api/matches/{id}/score")]
async fn api_edit_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<EditScoreBody>,
) -> HttpResponse {
    match state.edit_score(path.id, body.side, &body.value) {
        Ok(scores) => HttpResponse::Ok().json(scores),
        Err(e) => edit_error_response(&e),
    }
}

/// Save the displayed score of a match as its result.
#[post("/api/matches/{id}/save")]
async fn api_save_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.save_match(path.id).await {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => edit_error_response(&e),
    }
}

fn edit_error_response(e: &ScoreEditError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ScoreEditError::InvalidField(_) => HttpResponse::BadRequest().json(body),
        ScoreEditError::Submit(GatewayError::Rejected { .. }) => {
            HttpResponse::BadRequest().json(body)
        }
        ScoreEditError::Submit(GatewayError::Unauthorized) => {
            HttpResponse::Unauthorized().json(body)
        }
        ScoreEditError::Submit(_) => HttpResponse::BadGateway().json(body),
        ScoreEditError::UnknownMatch(_) => HttpResponse::NotFound().json(body),
        ScoreEditError::ReadOnly => HttpResponse::Forbidden().json(body),
        ScoreEditError::SaveInProgress(_) => HttpResponse::Conflict().json(body),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ViewerConfig::from_env();
    let public_uuid: Uuid = std::env::var("DART_PUBLIC_UUID")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "DART_PUBLIC_UUID must be set to the tournament's public id",
            )
        })?;
    let kind = match std::env::var("DART_VIEW_KIND") {
        Ok(raw) => raw
            .parse::<ViewKind>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        Err(_) => ViewKind::default(),
    };

    let session = Arc::new(Session::load(&config.session_path).map_err(io::Error::other)?);
    let gateway = Gateway::new(&config.api_base_url, session, config.request_timeout)
        .map_err(io::Error::other)?;
    let source = Arc::new(PublicTournamentSource::new(gateway.clone(), public_uuid));

    log::info!(
        "Following tournament {} at {} ({:?} view)",
        public_uuid,
        config.api_base_url,
        kind
    );
    let state = Data::new(LiveView::mount_editable(
        source,
        Arc::new(gateway),
        config.live_view(kind),
    ));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    log::info!("Starting display station at http://{}:{}", host, port);

    let server_state = state.clone();
    let result = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .service(api_health)
            .service(api_get_view)
            .service(api_select_tab)
            .service(api_set_auto_advance)
            .service(api_edit_score)
            .service(api_save_match)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    state.unmount();
    result
}
