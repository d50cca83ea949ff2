//! Prompt construction.

use signal_core::types::{Reading, SignalRequest};

/// Render the user prompt for a signal request.
///
/// Every indicator is listed; missing values read `not available` so the
/// model never mistakes them for zero.
pub fn build_prompt(request: &SignalRequest) -> String {
    let snap = &request.snapshot;
    let asset = request.instrument.id();

    format!(
        "Given the following {mode} trading market conditions for {asset}:\n\
         - Last close: {close}\n\
         - RSI: {rsi}\n\
         - MACD: {macd}\n\
         - EMA-50: {ema_50}\n\
         - EMA-200: {ema_200}\n\
         - Bollinger Bands: High {bb_high}, Low {bb_low}\n\
         \n\
         Predict the best trade signal (Buy, Sell, Hold) with Entry, Stop Loss, and Take Profit.\n\
         Return result in JSON format:\n\
         \n\
         {{\n  \"signal\": \"\",\n  \"entry\": \"\",\n  \"stop_loss\": \"\",\n  \"take_profit\": \"\",\n  \"asset\": \"{asset}\"\n}}\n",
        mode = request.mode.label(),
        asset = asset,
        close = Reading(Some(snap.close)),
        rsi = Reading(snap.rsi),
        macd = Reading(snap.macd),
        ema_50 = Reading(snap.ema_50),
        ema_200 = Reading(snap.ema_200),
        bb_high = Reading(snap.bollinger_high),
        bb_low = Reading(snap.bollinger_low),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{IndicatorSnapshot, Instrument, TradeMode};

    #[test]
    fn test_prompt_lists_every_indicator() {
        let request = SignalRequest::new(
            Instrument::crypto("BTCUSDT").unwrap(),
            TradeMode::Futures,
            IndicatorSnapshot {
                timestamp: 0,
                close: 43250.5,
                rsi: Some(61.5),
                macd: Some(-12.25),
                ema_50: Some(43000.0),
                ema_200: None,
                bollinger_high: Some(44000.0),
                bollinger_low: Some(42000.0),
            },
        );
        let prompt = build_prompt(&request);

        assert!(prompt.starts_with("Given the following Futures trading market conditions for BTCUSDT:"));
        assert!(prompt.contains("- Last close: 43250.5"));
        assert!(prompt.contains("- RSI: 61.5"));
        assert!(prompt.contains("- MACD: -12.25"));
        assert!(prompt.contains("- EMA-200: not available"));
        assert!(prompt.contains("- Bollinger Bands: High 44000, Low 42000"));
        assert!(prompt.contains("\"asset\": \"BTCUSDT\""));
        assert!(prompt.contains("\"stop_loss\""));
    }

    #[test]
    fn test_forex_prompt_with_no_indicators() {
        let request = SignalRequest::new(
            Instrument::forex("USDJPY").unwrap(),
            TradeMode::Forex,
            IndicatorSnapshot {
                close: 149.52,
                ..Default::default()
            },
        );
        let prompt = build_prompt(&request);

        assert!(prompt.contains("Forex trading market conditions for USDJPY"));
        assert!(prompt.contains("- Last close: 149.52"));
        assert_eq!(prompt.matches("not available").count(), 6);
    }
}
