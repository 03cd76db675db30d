use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_files::Files;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{error, info};
use crate::output::{month_stats, parse_month_key, CalendarFile};

pub struct AppState {
    pub calendar: CalendarFile,
}

fn read_error(e: crate::error::ScheduleError) -> HttpResponse {
    error!(error = %e, "could not read guard calendar");
    HttpResponse::InternalServerError().json(serde_json::json!({"error": "Calendar unavailable"}))
}

// Whole calendar
async fn get_calendar(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.calendar.load() {
        Ok(calendar) => Ok(HttpResponse::Ok().json(calendar)),
        Err(e) => Ok(read_error(e)),
    }
}

/// Validates the month key and looks it up in the stored calendar,
/// or returns the response to send instead (400, 404 or 500)
fn stored_month(month: &str, state: &AppState) -> std::result::Result<BTreeMap<String, Vec<String>>, HttpResponse> {
    if parse_month_key(month).is_err() {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid month, expected YYYY-MM"})));
    }

    let mut calendar = state.calendar.load().map_err(read_error)?;
    calendar
        .remove(month)
        .ok_or_else(|| HttpResponse::NotFound().json(serde_json::json!({"error": "Month not generated"})))
}

// One month
async fn get_month(month: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match stored_month(&month, &state) {
        Ok(days) => Ok(HttpResponse::Ok().json(days)),
        Err(response) => Ok(response),
    }
}

// Guard counts for one month
async fn get_stats(month: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match stored_month(&month, &state) {
        Ok(days) => Ok(HttpResponse::Ok().json(month_stats(&month, &days))),
        Err(response) => Ok(response),
    }
}

/// API routes, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/guardias", web::get().to(get_calendar))
        .service(web::resource("/api/guardias/{month}").route(web::get().to(get_month)))
        .service(web::resource("/api/stats/{month}").route(web::get().to(get_stats)));
}

pub async fn start_server(port: u16, calendar: CalendarFile, public_dir: PathBuf) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { calendar });
    let serve_static = public_dir.is_dir();
    if !serve_static {
        info!(dir = %public_dir.display(), "public directory not found, serving API only");
    }

    info!(port, "starting guard calendar server");

    HttpServer::new(move || {
        let app = App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure);
        if serve_static {
            app.service(Files::new("/", public_dir.clone()).index_file("index.html"))
        } else {
            app
        }
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
