//! Console rendering of snapshots and signals.

use signal_core::types::{IndicatorSnapshot, Instrument, Reading, Recommendation, TradeMode};
use signal_engine::{PipelineObserver, PipelineOutput};
use std::fmt::Write;

/// Indicator table for one snapshot.
pub fn render_snapshot(instrument: &Instrument, mode: TradeMode, snapshot: &IndicatorSnapshot) -> String {
    let mut out = String::new();
    let when = chrono::DateTime::from_timestamp_millis(snapshot.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| snapshot.timestamp.to_string());

    let _ = writeln!(out, "{} ({}) at {}", instrument, mode, when);
    let _ = writeln!(out, "  {:<16}{}", "Close", Reading(Some(snapshot.close)));
    for (label, value) in snapshot.readings() {
        let _ = writeln!(out, "  {:<16}{:.4}", label, Reading(value));
    }
    out
}

/// Human-readable block for one pipeline output.
pub fn render_output(output: &PipelineOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Signal #{} for {} ({}) at {} ===",
        output.iteration,
        output.instrument,
        output.mode,
        output.produced_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    match &output.outcome {
        Ok(response) => match &response.recommendation {
            Ok(rec) => render_recommendation(&mut out, rec),
            Err(err) => {
                let _ = writeln!(out, "Could not read a recommendation ({}).", err.reason);
                let _ = writeln!(out, "Raw reply:\n{}", response.content);
            }
        },
        Err(err) => {
            let _ = writeln!(out, "Signal request failed: {}", err);
        }
    }
    out
}

fn render_recommendation(out: &mut String, rec: &Recommendation) {
    let _ = writeln!(out, "  {:<13}{}", "Signal", rec.signal);
    for (label, value) in [
        ("Entry", rec.entry),
        ("Stop loss", rec.stop_loss),
        ("Take profit", rec.take_profit),
    ] {
        match value {
            Some(v) => {
                let _ = writeln!(out, "  {:<13}{}", label, v);
            }
            None => {
                let _ = writeln!(out, "  {:<13}-", label);
            }
        }
    }
    if let Some(asset) = &rec.asset {
        let _ = writeln!(out, "  {:<13}{}", "Asset", asset);
    }
}

/// Prints every output to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl PipelineObserver for ConsoleObserver {
    fn on_output(&self, output: &PipelineOutput) {
        println!("\n{}", render_output(output));
    }
}
