//! Signal request/response types and recommendation parsing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{IndicatorSnapshot, Instrument, TradeMode};
use crate::error::MalformedSignal;

/// Everything the inference service is told about one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRequest {
    pub instrument: Instrument,
    pub mode: TradeMode,
    pub snapshot: IndicatorSnapshot,
}

impl SignalRequest {
    pub fn new(instrument: Instrument, mode: TradeMode, snapshot: IndicatorSnapshot) -> Self {
        Self {
            instrument,
            mode,
            snapshot,
        }
    }
}

/// Recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => f.write_str("Buy"),
            SignalAction::Sell => f.write_str("Sell"),
            SignalAction::Hold => f.write_str("Hold"),
        }
    }
}

impl FromStr for SignalAction {
    type Err = MalformedSignal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "long" => Ok(SignalAction::Buy),
            "sell" | "short" => Ok(SignalAction::Sell),
            "hold" | "neutral" | "wait" => Ok(SignalAction::Hold),
            other => Err(MalformedSignal::new(format!("unknown signal '{}'", other))),
        }
    }
}

/// A structured recommendation extracted from the service's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub signal: SignalAction,
    pub entry: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub asset: Option<String>,
}

impl Recommendation {
    /// Extract a recommendation from free-form reply text.
    ///
    /// Accepts a bare JSON object, one wrapped in a fenced code block or
    /// prose, or the brace-less `"key": "value"` listing some models echo
    /// back. Prices may be numbers or strings such as `"$43,250.5"`; blank
    /// or unparseable prices become `None`.
    pub fn parse(content: &str) -> Result<Self, MalformedSignal> {
        let object = extract_object(content)
            .ok_or_else(|| MalformedSignal::new("no JSON object found in reply"))?;

        // Keys are matched case-insensitively.
        let fields: Map<String, Value> = object
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();

        let signal = match fields.get("signal") {
            Some(Value::String(s)) => s.parse::<SignalAction>()?,
            Some(other) => {
                return Err(MalformedSignal::new(format!("signal is not a string: {}", other)))
            }
            None => return Err(MalformedSignal::new("missing 'signal' field")),
        };

        let asset = match fields.get("asset") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        };

        Ok(Self {
            signal,
            entry: fields.get("entry").and_then(price),
            stop_loss: fields.get("stop_loss").and_then(price),
            take_profit: fields.get("take_profit").and_then(price),
            asset,
        })
    }
}

/// The service's reply for one request.
///
/// `content` is always kept verbatim so a malformed reply can still be
/// displayed or logged.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalResponse {
    pub content: String,
    pub recommendation: Result<Recommendation, MalformedSignal>,
}

impl SignalResponse {
    /// Wrap reply text, attempting to parse a recommendation from it.
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let recommendation = Recommendation::parse(&content);
        Self {
            content,
            recommendation,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.recommendation.is_ok()
    }
}

fn extract_object(content: &str) -> Option<Map<String, Value>> {
    let mut candidates = Vec::new();

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            candidates.push(content[start..=end].to_string());
        }
    }

    let stripped = strip_fences(content);
    let stripped = stripped.trim().trim_end_matches(',');
    if !stripped.is_empty() && !stripped.starts_with('{') {
        candidates.push(format!("{{{}}}", stripped));
    }

    candidates
        .iter()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
}

fn strip_fences(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn price(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.replace(['$', ',', ' '], ""),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
