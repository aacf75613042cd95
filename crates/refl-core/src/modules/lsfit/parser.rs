use super::PARAMETER_SENTINEL;
use crate::domain::{ConvertError, ConvertResult, LayerPosition};

/// One parameter line of an LSFIT control file, as read back for
/// inspection. Follows the same region rules as the transformer: the
/// region starts after the sentinel and ends at the first line whose
/// first token is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct LsfitRow {
    pub index: u32,
    pub name: String,
    pub position: LayerPosition,
    pub value: f64,
    pub increment: f64,
}

pub fn read_lsfit_rows(content: &str) -> ConvertResult<Vec<LsfitRow>> {
    let mut lines = content.lines();
    if !lines.any(|line| line.contains(PARAMETER_SENTINEL)) {
        return Err(ConvertError::MissingHeader);
    }

    let mut rows = Vec::new();
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };
        if !first.chars().all(|c| c.is_ascii_digit()) {
            break;
        }
        if let Some(row) = decode_row(&tokens) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// `<index> <name-tokens...> part <g> at <i> <value> <increment>`; lines
/// that do not fit the grammar are skipped, matching the transformer's
/// passthrough.
fn decode_row(tokens: &[&str]) -> Option<LsfitRow> {
    if tokens.len() < 8 {
        return None;
    }
    let triple = tokens.len() - 6;
    if tokens[triple] != "part" || tokens[triple + 2] != "at" {
        return None;
    }
    Some(LsfitRow {
        index: tokens[0].parse().ok()?,
        name: tokens[1..triple].join(" "),
        position: LayerPosition::new(
            tokens[triple + 1].parse().ok()?,
            tokens[triple + 3].parse().ok()?,
        ),
        value: tokens[tokens.len() - 2].parse().ok()?,
        increment: tokens[tokens.len() - 1].parse().ok()?,
    })
}
