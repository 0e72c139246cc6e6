use std::io::{self, BufRead, Write};

use crate::blocks::{self, TimeBlock};
use crate::display;
use crate::form::export::{default_export_path, export_grid_csv};
use crate::form::submission::PreferenceSubmission;
use crate::grid::PreferenceGrid;
use crate::theme::{default_settings_path, FileSettings, ThemeService};

/// Fixed message shown when the server accepts a submission.
pub const SUCCESS_MESSAGE: &str = "Preferencias enviadas correctamente.";

/// Result of one submit action. Server-reported errors and transport
/// failures land in the same variant; only the message tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure(String),
}

/// Confirmation banner styles, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    Success,
    Danger,
}

impl BannerStyle {
    pub fn class(self) -> &'static str {
        match self {
            BannerStyle::Success => "alert-success",
            BannerStyle::Danger => "alert-danger",
        }
    }
}

/// Confirmation banner state: hidden until the first outcome resolves, then
/// exactly one style plus a message. Always reflects the most recently
/// resolved submission.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    state: Option<(BannerStyle, String)>,
}

impl Banner {
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Drops any prior styling, then applies the style for this outcome.
    pub fn apply(&mut self, outcome: &SubmitOutcome) {
        self.clear();
        self.state = Some(match outcome {
            SubmitOutcome::Success => (BannerStyle::Success, SUCCESS_MESSAGE.to_string()),
            SubmitOutcome::Failure(message) => (BannerStyle::Danger, message.clone()),
        });
    }

    pub fn state(&self) -> Option<(BannerStyle, &str)> {
        self.state
            .as_ref()
            .map(|(style, message)| (*style, message.as_str()))
    }
}

/// Classifies a reply body (or a transport error description) into an
/// outcome. A body carrying an `error` field fails with that message
/// verbatim; any other body counts as success.
pub fn interpret_reply(reply: Result<serde_json::Value, String>) -> SubmitOutcome {
    match reply {
        Ok(body) => match body.get("error") {
            Some(error) if !error.is_null() => {
                let message = error
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                SubmitOutcome::Failure(message)
            }
            _ => SubmitOutcome::Success,
        },
        Err(description) => SubmitOutcome::Failure(description),
    }
}

/// Sends one submission to the server. Exactly one request per call, no
/// timeout, no retry; a hung server leaves the caller waiting until the
/// transport gives up on its own.
pub async fn submit(
    http: &reqwest::Client,
    base_url: &str,
    submission: &PreferenceSubmission,
) -> SubmitOutcome {
    let url = format!("{}/submit", base_url.trim_end_matches('/'));
    let reply = match http.post(&url).json(submission).send().await {
        Ok(response) => match response.json::<serde_json::Value>().await {
            Ok(body) => Ok(body),
            Err(e) => Err(e.to_string()),
        },
        Err(e) => Err(e.to_string()),
    };
    interpret_reply(reply)
}

/// Fetches the grid definition the server renders cells from.
pub async fn fetch_blocks(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<TimeBlock>, Box<dyn std::error::Error>> {
    let url = format!("{}/api/blocks", base_url.trim_end_matches('/'));
    let blocks = http.get(&url).send().await?.json::<Vec<TimeBlock>>().await?;
    if blocks.is_empty() {
        return Err("el servidor devolvió una grilla vacía".into());
    }
    Ok(blocks)
}

fn print_help(dias: &[String], filas: usize) {
    println!("Comandos:");
    println!("  <dia> <fila>   cambia la preferencia de una celda (p. ej. \"lun 3\")");
    println!("                 dias: {}  filas: 1..{}", dias.join(" "), filas);
    println!("  min            activa/desactiva \"minimizar días\"");
    println!("  tema           alterna tema claro/oscuro");
    println!("  export [ruta]  exporta la grilla a CSV");
    println!("  enviar         envía las preferencias al servidor");
    println!("  ayuda          muestra esta ayuda");
    println!("  salir          termina sin enviar");
}

/// Runs the interactive preference form against a server.
///
/// The grid mounts from the server's block definition with every cell
/// unset; each command round renders the grid, the checkbox and the banner,
/// then applies one command. The form stays usable after any outcome.
pub async fn run_form(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let http = reqwest::Client::new();

    println!("Conectando con {}...", base_url);
    let blocks = fetch_blocks(&http, base_url).await?;
    let dias = blocks::dias(&blocks);
    let filas = blocks::horas(&blocks).len();

    let mut grid = PreferenceGrid::mount(&blocks);
    let mut min_dias = false;
    let mut banner = Banner::default();
    let mut theme = ThemeService::new(FileSettings::open(default_settings_path()));

    println!("Preferencias de horario ({} bloques)", blocks.len());
    print_help(&dias, filas);

    let stdin = io::stdin();
    loop {
        println!();
        println!("{}", display::render_grid(&blocks, &grid, theme.get()));
        println!("{}", display::render_checkbox(min_dias));
        if let Some(line) = display::render_banner(&banner) {
            println!("{}", line);
        }

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => {}
            ["salir"] | ["q"] => break,
            ["ayuda"] => print_help(&dias, filas),
            ["min"] => {
                min_dias = !min_dias;
            }
            ["tema"] => match theme.toggle() {
                Ok(next) => println!("Tema: {}", next.as_str()),
                Err(e) => log::warn!("could not persist theme: {}", e),
            },
            ["export"] => {
                let path = default_export_path();
                match export_grid_csv(&blocks, &grid, min_dias, &path) {
                    Ok(()) => println!("Grilla exportada a {}", path.display()),
                    Err(e) => println!("No se pudo exportar: {}", e),
                }
            }
            ["export", ruta] => {
                let path = std::path::PathBuf::from(ruta);
                match export_grid_csv(&blocks, &grid, min_dias, &path) {
                    Ok(()) => println!("Grilla exportada a {}", path.display()),
                    Err(e) => println!("No se pudo exportar: {}", e),
                }
            }
            ["enviar"] => {
                let submission = PreferenceSubmission::new(grid.collect(), min_dias);
                let outcome = submit(&http, base_url, &submission).await;
                banner.apply(&outcome);
            }
            [dia, fila] => {
                let position = fila
                    .parse::<usize>()
                    .ok()
                    .and_then(|f| blocks::find_block(&blocks, dia, f));
                match position {
                    Some(block) => {
                        grid.advance(block.id);
                    }
                    None => println!("Celda desconocida: {} {}", dia, fila),
                }
            }
            _ => println!("Comando no reconocido (\"ayuda\" para ver opciones)"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn error_body_fails_with_the_message_verbatim() {
        let outcome = interpret_reply(Ok(json!({"error": "Horario inválido"})));
        assert_eq!(outcome, SubmitOutcome::Failure("Horario inválido".to_string()));
    }

    #[test]
    fn body_without_error_field_is_success() {
        let outcome = interpret_reply(Ok(json!({"status": "ok"})));
        assert_eq!(outcome, SubmitOutcome::Success);

        let outcome = interpret_reply(Ok(json!({"success": true, "message": "guardado"})));
        assert_eq!(outcome, SubmitOutcome::Success);
    }

    #[test]
    fn transport_description_becomes_the_failure_message() {
        let outcome = interpret_reply(Err("connection refused".to_string()));
        assert_eq!(
            outcome,
            SubmitOutcome::Failure("connection refused".to_string())
        );
    }

    #[test]
    fn non_string_error_field_still_fails() {
        let outcome = interpret_reply(Ok(json!({"error": 500})));
        assert_eq!(outcome, SubmitOutcome::Failure("500".to_string()));
    }

    #[test]
    fn banner_applies_exactly_one_style_per_outcome() {
        let mut banner = Banner::default();
        assert!(banner.state().is_none());

        banner.apply(&SubmitOutcome::Failure("Horario inválido".to_string()));
        let (style, message) = banner.state().expect("banner set");
        assert_eq!(style, BannerStyle::Danger);
        assert_eq!(style.class(), "alert-danger");
        assert_eq!(message, "Horario inválido");

        // A later success replaces the failure styling entirely.
        banner.apply(&SubmitOutcome::Success);
        let (style, message) = banner.state().expect("banner set");
        assert_eq!(style, BannerStyle::Success);
        assert_eq!(style.class(), "alert-success");
        assert_eq!(message, SUCCESS_MESSAGE);

        banner.clear();
        assert!(banner.state().is_none());
    }

    #[tokio::test]
    async fn submit_survives_connection_refused() {
        // Port 9 (discard) has no listener; the transport error must come
        // back as a failure outcome instead of escaping the flow.
        let http = reqwest::Client::new();
        let submission = PreferenceSubmission::new(HashMap::new(), false);
        let outcome = submit(&http, "http://127.0.0.1:9", &submission).await;
        match outcome {
            SubmitOutcome::Failure(message) => assert!(!message.is_empty()),
            SubmitOutcome::Success => panic!("refused connection cannot succeed"),
        }
    }
}
