mod generate;
mod parser;
mod transform;

pub use generate::generate_listing;
pub use parser::{LsfitRow, read_lsfit_rows};
pub use transform::transform_template;

use std::fs;
use std::path::Path;

/// Sentinel line that ends the LSFIT preamble; data lines follow it.
pub const PARAMETER_SENTINEL: &str = "### name of parameter.............";

/// First line of every LSFIT control file.
pub const LISTING_BANNER: &str =
    "Parameter and refinement control file produced by program LSFIT";

/// Column header emitted above the parameter listing.
pub const LISTING_COLUMNS: &str =
    "### name of parameter.............  Value          Increment";

/// A reassembled LSFIT control file: fixed literal header block, the
/// transformed body, and a fixed literal tail block. Header and tail are
/// owned by the caller, never derived from the input template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsfitDocument {
    pub header: String,
    pub body: String,
    pub tail: String,
}

impl LsfitDocument {
    pub fn new(
        header: impl Into<String>,
        body: impl Into<String>,
        tail: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            tail: tail.into(),
        }
    }

    pub fn render(&self) -> String {
        let mut rendered =
            String::with_capacity(self.header.len() + self.body.len() + self.tail.len());
        rendered.push_str(&self.header);
        rendered.push_str(&self.body);
        rendered.push_str(&self.tail);
        rendered
    }

    /// Writes the rendered document in one shot, so a failed transformation
    /// upstream never leaves a partial file behind.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.render())
    }
}

/// LSFIT columns hold `d.dddddde±XX`: six fractional digits and a
/// two-digit signed exponent. Rust's `{:e}` writes a bare one-digit
/// exponent, so the exponent is re-rendered here.
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or_default();
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => formatted,
    }
}
