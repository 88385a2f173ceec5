//! Numeric coercion for raw cell values

use anyhow::{Context, Result};

/// Coerce a raw cell string into a numeric value.
///
/// Integer literals are parsed first so a plain whole number is never
/// subject to floating rounding on the way in; everything else goes through
/// the general float parse.
pub fn coerce_numeric(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();

    if let Ok(int_value) = trimmed.parse::<i64>() {
        return Ok(int_value as f64);
    }

    trimmed
        .parse::<f64>()
        .with_context(|| format!("cannot convert value '{}' to a number", raw))
}
