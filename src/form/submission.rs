use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::blocks::TimeBlock;

/// Submitted preferences matching the wire format: a sparse mapping of
/// block id to rank (only cells with a nonzero rank appear) plus the
/// minimize-days checkbox. Built fresh on every submit action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSubmission {
    pub preferences: HashMap<String, u8>,
    #[serde(default)]
    pub min_dias: bool,
}

impl PreferenceSubmission {
    pub fn new(preferences: HashMap<String, u8>, min_dias: bool) -> Self {
        PreferenceSubmission {
            preferences,
            min_dias,
        }
    }
}

/// Validates a submission against the grid definition.
///
/// Ranks must be 1..=3 (zero is never sent, it is encoded by omission) and
/// every id must name a known block. An empty mapping is valid.
pub fn validate_submission(
    submission: &PreferenceSubmission,
    blocks: &[TimeBlock],
) -> Result<(), String> {
    for (id, valor) in &submission.preferences {
        if !(1..=3).contains(valor) {
            return Err(format!("Valor de prioridad inválido: {}", valor));
        }

        let known = id
            .trim()
            .parse::<u32>()
            .map(|n| blocks.iter().any(|b| b.id == n))
            .unwrap_or(false);
        if !known {
            return Err(format!("No se encontró un bloque horario con ID {}", id));
        }
    }

    Ok(())
}
