use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use log::{info, warn};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::error::GatewayError;
use crate::form::parse_body;
use crate::pipeline::{
    PredictResources, PredictWaitingTime, Prediction, PredictionGateway, ScheduleAppointment,
};

// Read-only for the whole process; nothing here changes between requests
pub struct AppState {
    pub gateway: PredictionGateway,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    backend: String,
}

// Prediction endpoints, one instantiation per prediction kind
async fn predict<P: Prediction>(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let raw = parse_body(&body)?;
    let result = state.gateway.run::<P>(&raw).await.map_err(|err| {
        warn!("[gateway] {} failed: {}", P::ENDPOINT, err);
        err
    })?;
    Ok(HttpResponse::Ok().json(result))
}

// Liveness of the gateway itself, the backend has no health route
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.gateway.backend_url().to_string(),
    })
}

/// Registers every route on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health))
        .route("/api/scheduleappointment", web::post().to(predict::<ScheduleAppointment>))
        .route("/api/predictwaitingtime", web::post().to(predict::<PredictWaitingTime>))
        .route("/api/predictresources", web::post().to(predict::<PredictResources>));
}

pub async fn start_server(server: &ServerConfig, gateway: PredictionGateway) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { gateway });

    info!(
        "[gateway] listening on http://{}:{}, forwarding to {}",
        server.host,
        server.port,
        app_state.gateway.backend_url()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .configure(configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
