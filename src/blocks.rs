use csv::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One (day, teaching hour) unit of the preference grid.
///
/// Ids are stable integers assigned when the grid definition is built and
/// are the keys of the submitted preference mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: u32,
    pub dia: String,
    pub hora: String,
}

/// Day keys in grid order, with their display labels.
pub const DAYS: [(&str, &str); 5] = [
    ("lun", "Lunes"),
    ("mar", "Martes"),
    ("mie", "Miércoles"),
    ("jue", "Jueves"),
    ("vie", "Viernes"),
];

/// Teaching hours in grid order.
pub const HOURS: [&str; 9] = [
    "08:00 - 8:50",
    "8:50 - 9:40",
    "9:50 - 10:40",
    "10:40 - 11:30",
    "11:40 - 12:30",
    "12:30 - 13:20",
    "13:20 - 14:10",
    "14:10 - 15:00",
    "15:10 - 16:00",
];

/// Returns the display label for a day key, or the key itself if unknown.
pub fn day_label(dia: &str) -> &str {
    DAYS.iter()
        .find(|(key, _)| *key == dia)
        .map(|(_, label)| *label)
        .unwrap_or(dia)
}

/// Builds the default grid definition: 5 days x 9 teaching hours,
/// ids assigned day-major starting at 1.
pub fn default_blocks() -> Vec<TimeBlock> {
    let mut blocks = Vec::with_capacity(DAYS.len() * HOURS.len());
    let mut id = 1;
    for (dia, _) in DAYS {
        for hora in HOURS {
            blocks.push(TimeBlock {
                id,
                dia: dia.to_string(),
                hora: hora.to_string(),
            });
            id += 1;
        }
    }
    blocks
}

/// Loads a custom grid definition from a CSV file with `id,dia,hora` columns.
///
/// Column order is resolved from the header by name, falling back to the
/// default positions. Incomplete rows and duplicate ids are skipped.
pub fn load_blocks<P: AsRef<Path>>(csv_path: P) -> Result<Vec<TimeBlock>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(csv_path)?;

    let headers = reader.headers()?;
    let id_col = headers.iter().position(|h| h.trim() == "id").unwrap_or(0);
    let dia_col = headers.iter().position(|h| h.trim() == "dia").unwrap_or(1);
    let hora_col = headers.iter().position(|h| h.trim() == "hora").unwrap_or(2);

    let mut seen_ids = HashSet::new();
    let mut blocks = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() < 3 {
            continue;
        }

        let id: u32 = match record.get(id_col).unwrap_or("").trim().parse() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let dia = record.get(dia_col).unwrap_or("").trim().to_string();
        let hora = record.get(hora_col).unwrap_or("").trim().to_string();
        if dia.is_empty() || hora.is_empty() {
            continue;
        }
        if !seen_ids.insert(id) {
            continue;
        }

        blocks.push(TimeBlock { id, dia, hora });
    }

    if blocks.is_empty() {
        return Err("no valid time blocks found in CSV".into());
    }
    Ok(blocks)
}

/// Distinct day keys in first-seen order.
pub fn dias(blocks: &[TimeBlock]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for block in blocks {
        if !out.contains(&block.dia) {
            out.push(block.dia.clone());
        }
    }
    out
}

/// Distinct hour labels in first-seen order.
pub fn horas(blocks: &[TimeBlock]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for block in blocks {
        if !out.contains(&block.hora) {
            out.push(block.hora.clone());
        }
    }
    out
}

/// Finds the block at a (day key, 1-based hour row) grid position.
pub fn find_block<'a>(blocks: &'a [TimeBlock], dia: &str, fila: usize) -> Option<&'a TimeBlock> {
    let horas = horas(blocks);
    let hora = horas.get(fila.checked_sub(1)?)?;
    blocks.iter().find(|b| b.dia == dia && &b.hora == hora)
}
