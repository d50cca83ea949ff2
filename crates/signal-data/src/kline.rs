//! Kline row decoding shared by the crypto venues.

use serde_json::Value;
use signal_core::error::FetchError;
use signal_core::types::Bar;

/// Decode `[open_time, open, high, low, close, volume, ...]` rows.
///
/// Fields may be JSON numbers or numeric strings. A single malformed row
/// rejects the whole response.
pub(crate) fn parse_rows(rows: &[Value]) -> Result<Vec<Bar>, FetchError> {
    if rows.is_empty() {
        return Err(FetchError::Empty);
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|reason| FetchError::Schema(format!("kline row {}: {}", i, reason))))
        .collect()
}

fn parse_row(row: &Value) -> Result<Bar, String> {
    let fields = row.as_array().ok_or("expected an array")?;
    if fields.len() < 6 {
        return Err(format!("expected 6 fields, found {}", fields.len()));
    }

    let timestamp = timestamp(&fields[0]).ok_or("open time is not an integer")?;
    let mut prices = [0.0; 5];
    for (slot, (name, value)) in prices
        .iter_mut()
        .zip(["open", "high", "low", "close", "volume"].iter().zip(&fields[1..6]))
    {
        *slot = number(value).ok_or_else(|| format!("{} is not numeric", name))?;
    }

    let [open, high, low, close, volume] = prices;
    Ok(Bar::new(timestamp, open, high, low, close, volume))
}

/// A finite number given either as a JSON number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
