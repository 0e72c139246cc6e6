use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::blocks::{self, TimeBlock};
use crate::grid::PreferenceGrid;

/// Exports the current grid to a CSV matrix: one row per teaching hour, one
/// column per day, unset cells written as 0. A trailing row records the
/// minimize-days checkbox.
pub fn export_grid_csv(
    blocks: &[TimeBlock],
    grid: &PreferenceGrid,
    min_dias: bool,
    csv_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let dias = blocks::dias(blocks);
    let horas = blocks::horas(blocks);

    let mut wtr = WriterBuilder::new().from_path(csv_path)?;

    let mut header = vec!["Hora".to_string()];
    header.extend(dias.iter().map(|d| blocks::day_label(d).to_string()));
    wtr.write_record(&header)?;

    for hora in &horas {
        let mut row = vec![hora.clone()];
        for dia in &dias {
            let rank = blocks
                .iter()
                .find(|b| &b.dia == dia && &b.hora == hora)
                .and_then(|b| grid.rank_of(b.id))
                .unwrap_or_default();
            row.push(rank.as_int().to_string());
        }
        wtr.write_record(&row)?;
    }

    let mut tail = vec!["min_dias".to_string(), min_dias.to_string()];
    tail.resize(header.len(), String::new());
    wtr.write_record(&tail)?;

    wtr.flush()?;
    Ok(())
}

/// Default export filename, timestamped so repeated exports never clobber
/// each other.
pub fn default_export_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("preferencias-{}.csv", stamp))
}
