use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::blocks::{self, TimeBlock};
use crate::form::submission::{validate_submission, PreferenceSubmission};
use crate::grid::Rank;

/// A submission the server has accepted, with its arrival time.
#[derive(Debug, Clone)]
pub struct StoredSubmission {
    pub submission: PreferenceSubmission,
    pub received_at: DateTime<Utc>,
}

// In-memory storage for the latest submission (persistence is out of scope)
pub struct AppState {
    pub blocks: Vec<TimeBlock>,
    pub latest: Mutex<Option<StoredSubmission>>,
}

impl AppState {
    pub fn new(blocks: Vec<TimeBlock>) -> Self {
        AppState {
            blocks,
            latest: Mutex::new(None),
        }
    }
}

// Grid definition endpoint: the source of cell ids for any rendering layer
async fn get_blocks(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.blocks))
}

// Submission endpoint. The reply contract is body-content based: failures
// always carry an "error" field, whatever the transport status says.
async fn submit_preferences(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "No se ha podido decodificar correctamente el JSON"
            })))
        }
    };

    if value.get("preferences").is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Debes proporcionar preferencias."
        })));
    }

    let submission: PreferenceSubmission = match serde_json::from_value(value) {
        Ok(submission) => submission,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "No se ha podido decodificar correctamente el JSON"
            })))
        }
    };

    if let Err(message) = validate_submission(&submission, &state.blocks) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({ "error": message })));
    }

    log::info!(
        "accepted submission: {} preferences, min_dias={}",
        submission.preferences.len(),
        submission.min_dias
    );
    *state.latest.lock().unwrap() = Some(StoredSubmission {
        submission,
        received_at: Utc::now(),
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Preferencias guardadas correctamente"
    })))
}

/// Builds the read-only preferences page: the grid as an HTML table with
/// each cell carrying its block id and value class.
fn render_preferences_page(blocks: &[TimeBlock], latest: Option<&StoredSubmission>) -> String {
    let dias = blocks::dias(blocks);
    let horas = blocks::horas(blocks);
    let empty = HashMap::new();
    let preferences = latest
        .map(|stored| &stored.submission.preferences)
        .unwrap_or(&empty);

    let mut rows = String::new();
    for hora in &horas {
        rows.push_str("<tr>");
        rows.push_str(&format!("<th>{}</th>", hora));
        for dia in &dias {
            let block = blocks.iter().find(|b| &b.dia == dia && &b.hora == hora);
            match block {
                Some(block) => {
                    let rank = preferences
                        .get(&block.id.to_string())
                        .and_then(|v| Rank::from_int(*v))
                        .unwrap_or_default();
                    let class = match rank.style_class() {
                        Some(value_class) => format!("time-slot {}", value_class),
                        None => "time-slot".to_string(),
                    };
                    rows.push_str(&format!(
                        "<td class=\"{}\" data-id=\"{}\">{}</td>",
                        class,
                        block.id,
                        rank.display()
                    ));
                }
                None => rows.push_str("<td></td>"),
            }
        }
        rows.push_str("</tr>\n");
    }

    let status = match latest {
        Some(stored) => format!(
            "<p>Última respuesta: {} ({} bloques, minimizar días: {})</p>",
            stored.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
            stored.submission.preferences.len(),
            if stored.submission.min_dias { "sí" } else { "no" }
        ),
        None => "<p>Todavía no se recibieron preferencias.</p>".to_string(),
    };

    let mut header = String::from("<tr><th>Hora</th>");
    for dia in &dias {
        header.push_str(&format!("<th>{}</th>", blocks::day_label(dia)));
    }
    header.push_str("</tr>");

    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Preferencias de horario</title>\n\
         <link rel=\"stylesheet\" href=\"/static/style.css\">\n</head>\n<body>\n\
         <h1>Preferencias de horario</h1>\n{}\n<table>\n{}\n{}</table>\n</body>\n</html>\n",
        status, header, rows
    )
}

async fn preferences_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    let latest = state.latest.lock().unwrap();
    let html = render_preferences_page(&state.blocks, latest.as_ref());
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub async fn start_server(port: u16, blocks: Vec<TimeBlock>) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(blocks));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .route("/", web::get().to(index))
            .route("/preferences", web::get().to(preferences_page))
            .route("/api/blocks", web::get().to(get_blocks))
            .route("/submit", web::post().to(submit_preferences))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
