use crate::blocks::{self, TimeBlock};
use crate::client::{Banner, BannerStyle};
use crate::grid::{PreferenceGrid, Rank};
use crate::theme::Theme;

const RESET: &str = "\x1b[0m";

/// ANSI colour for a cell value. The dark theme uses the bright variants.
fn rank_colour(rank: Rank, theme: Theme) -> &'static str {
    match (rank, theme) {
        (Rank::Unset, _) => "\x1b[90m",
        (Rank::First, Theme::Light) => "\x1b[32m",
        (Rank::Second, Theme::Light) => "\x1b[33m",
        (Rank::Third, Theme::Light) => "\x1b[31m",
        (Rank::First, Theme::Dark) => "\x1b[92m",
        (Rank::Second, Theme::Dark) => "\x1b[93m",
        (Rank::Third, Theme::Dark) => "\x1b[91m",
    }
}

/// Renders the grid as a table: one row per teaching hour (numbered for the
/// cycle command), one column per day.
pub fn render_grid(blocks: &[TimeBlock], grid: &PreferenceGrid, theme: Theme) -> String {
    let dias = blocks::dias(blocks);
    let horas = blocks::horas(blocks);
    let label_width = horas.iter().map(|h| h.len()).max().unwrap_or(4);

    let mut out = String::new();
    out.push_str(&format!("{:>4} {:<width$}", "", "Hora", width = label_width));
    for dia in &dias {
        out.push_str(&format!(" {:>4}", dia));
    }
    out.push('\n');

    for (fila, hora) in horas.iter().enumerate() {
        out.push_str(&format!(
            "{:>4} {:<width$}",
            fila + 1,
            hora,
            width = label_width
        ));
        for dia in &dias {
            let rank = blocks
                .iter()
                .find(|b| &b.dia == dia && &b.hora == hora)
                .and_then(|b| grid.rank_of(b.id))
                .unwrap_or_default();
            out.push_str("    ");
            out.push_str(rank_colour(rank, theme));
            out.push_str(rank.display());
            out.push_str(RESET);
        }
        out.push('\n');
    }

    out
}

pub fn render_checkbox(min_dias: bool) -> String {
    let mark = if min_dias { "x" } else { " " };
    format!("[{}] minimizar días", mark)
}

/// Renders the confirmation banner, if an outcome has resolved. Failures
/// carry the "Error:" prefix the form always used.
pub fn render_banner(banner: &Banner) -> Option<String> {
    banner.state().map(|(style, message)| match style {
        BannerStyle::Success => format!("\x1b[32m{}\x1b[0m", message),
        BannerStyle::Danger => format!("\x1b[31mError: {}\x1b[0m", message),
    })
}
