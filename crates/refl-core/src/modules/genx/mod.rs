mod builder;

pub use builder::build_layer_stack;

use crate::domain::{ConvertError, ConvertResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reserved parameter prefix for instrument-scope rows; those rows never
/// describe a material layer.
pub const INSTRUMENT_PREFIX: &str = "inst";

const COLUMN_COUNT: usize = 5;

/// One row of a GenX parameter export: `parameter,value,fit,min,max`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenxRow {
    pub parameter: String,
    pub value: f64,
    pub fit: bool,
    pub min: f64,
    pub max: f64,
}

impl GenxRow {
    pub fn is_instrument(&self) -> bool {
        self.parameter.starts_with(INSTRUMENT_PREFIX)
    }

    /// Splits `<substance>.<feature>` on the first dot.
    pub fn substance_and_feature(&self) -> ConvertResult<(&str, &str)> {
        self.parameter
            .split_once('.')
            .ok_or_else(|| ConvertError::MalformedParameter {
                parameter: self.parameter.clone(),
            })
    }
}

/// A GenX parameter export, loaded from header-less CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenxTable {
    pub rows: Vec<GenxRow>,
}

impl GenxTable {
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConvertError::io(path, source))?;
        let table = Self::parse(&source)?;
        debug!(
            path = %path.display(),
            rows = table.rows.len(),
            "loaded GenX table"
        );
        Ok(table)
    }

    /// Parses header-less CSV. Rows with an empty field are dropped (the
    /// export writes blanks where GenX had no value); a row with the wrong
    /// number of fields or an unparseable field is an error.
    pub fn parse(source: &str) -> ConvertResult<Self> {
        let mut rows = Vec::new();
        for (row_number, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != COLUMN_COUNT {
                return Err(ConvertError::malformed_table(
                    row_number + 1,
                    format!("expected {COLUMN_COUNT} fields, found {}", fields.len()),
                ));
            }
            if fields.iter().any(|field| field.is_empty()) {
                continue;
            }
            rows.push(GenxRow {
                parameter: fields[0].to_string(),
                value: parse_float(fields[1], row_number + 1, "value")?,
                fit: parse_fit_flag(fields[2], row_number + 1)?,
                min: parse_float(fields[3], row_number + 1, "min")?,
                max: parse_float(fields[4], row_number + 1, "max")?,
            });
        }
        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_float(field: &str, row: usize, column: &str) -> ConvertResult<f64> {
    field.parse::<f64>().map_err(|_| {
        ConvertError::malformed_table(row, format!("{column} field '{field}' is not a number"))
    })
}

/// GenX exports write Python booleans; accept both spellings plus 0/1.
fn parse_fit_flag(field: &str, row: usize) -> ConvertResult<bool> {
    match field {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => Err(ConvertError::malformed_table(
            row,
            format!("fit field '{other}' is not a boolean"),
        )),
    }
}
