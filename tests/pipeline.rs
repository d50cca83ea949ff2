//! End-to-end runs against a canned HTTP responder.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{json, Value};
use signal_core::error::{FetchError, InferenceError};
use signal_core::traits::MarketDataSource;
use signal_core::types::{Instrument, Timeframe, TradeMode};
use signal_data::{BinanceConfig, BinanceSource, ForexConfig, ForexSource, MarketRouter};
use signal_engine::{ContinuePrompt, LoopConfig, LoopState, PipelineObserver, PipelineOutput, PollingLoop, RunMode};
use signal_inference::{InferenceConfig, OpenRouterClient};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Route: exact path, status code and JSON body.
type Route = (&'static str, u16, Value);

/// Serve canned replies on an ephemeral port. Query strings are ignored.
async fn serve(routes: Vec<Route>) -> SocketAddr {
    let mut app = Router::new();
    for (path, status, body) in routes {
        let status = StatusCode::from_u16(status).expect("status code");
        app = app.route(
            path,
            any(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn kline_rows(count: usize) -> Value {
    let rows: Vec<Value> = (0..count)
        .map(|i| {
            let close = 100.0 + 0.5 * i as f64;
            json!([
                1_700_000_000_000i64 + i as i64 * 3_600_000,
                format!("{}", close - 0.25),
                format!("{}", close + 1.0),
                format!("{}", close - 1.0),
                format!("{}", close),
                "12.5",
                1_700_000_000_000i64 + (i as i64 + 1) * 3_600_000 - 1,
                "0", 10, "0", "0", "0"
            ])
        })
        .collect();
    Value::Array(rows)
}

fn binance(addr: SocketAddr) -> BinanceSource {
    BinanceSource::new(BinanceConfig {
        spot_base_url: format!("http://{}", addr),
        futures_base_url: format!("http://{}", addr),
        interval: Timeframe::Hour1,
        timeout_secs: 5,
    })
    .expect("binance source")
}

fn completions(addr: SocketAddr) -> OpenRouterClient {
    let mut config = InferenceConfig::new("test-key");
    config.base_url = format!("http://{}/v1", addr);
    config.timeout_secs = 5;
    OpenRouterClient::new(config).expect("client")
}

struct Answer(bool);

#[async_trait]
impl ContinuePrompt for Answer {
    async fn ask(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
struct Recorder {
    states: Mutex<Vec<LoopState>>,
    outputs: Mutex<Vec<PipelineOutput>>,
}

impl PipelineObserver for Recorder {
    fn on_transition(&self, _from: LoopState, to: LoopState, _iteration: u64) {
        self.states.lock().unwrap().push(to);
    }

    fn on_output(&self, output: &PipelineOutput) {
        self.outputs.lock().unwrap().push(output.clone());
    }
}

#[tokio::test]
async fn binance_klines_become_a_series() {
    let addr = serve(vec![("/api/v3/klines", 200, kline_rows(60))]).await;
    let source = binance(addr);

    let btc = Instrument::crypto("BTCUSDT").unwrap();
    let series = source.fetch(&btc, TradeMode::Spot, 50).await.unwrap();

    assert_eq!(series.len(), 50);
    assert_eq!(series.last().unwrap().close, 129.5);
    assert!(series.bars().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn binance_error_object_is_a_provider_error() {
    let addr = serve(vec![(
        "/fapi/v1/klines",
        400,
        json!({"code": -1121, "msg": "Invalid symbol."}),
    )])
    .await;
    let source = binance(addr);

    let bogus = Instrument::crypto("NOPEUSDT").unwrap();
    let err = source.fetch(&bogus, TradeMode::Futures, 50).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Provider {
            code: -1121,
            message: "Invalid symbol.".to_string()
        }
    );
}

#[tokio::test]
async fn forex_missing_quote_is_reported() {
    let addr = serve(vec![(
        "/v6/secret/latest/USD",
        200,
        json!({"result": "success", "conversion_rates": {"USD": 1, "EUR": 0.92}}),
    )])
    .await;
    let forex = ForexSource::new(ForexConfig {
        base_url: format!("http://{}/v6", addr),
        api_key: "secret".to_string(),
        timeout_secs: 5,
    })
    .unwrap();
    let router = MarketRouter::new(Arc::new(binance(addr))).with_forex(Arc::new(forex));

    let usdjpy = Instrument::forex("USDJPY").unwrap();
    let err = router.fetch(&usdjpy, TradeMode::Forex, 50).await.unwrap_err();

    assert_eq!(err, FetchError::MissingRate("JPY".to_string()));
}

#[tokio::test]
async fn inference_failure_is_reported_and_loop_waits() {
    let addr = serve(vec![
        ("/api/v3/klines", 200, kline_rows(60)),
        ("/v1/chat/completions", 500, json!({"error": {"message": "upstream exploded"}})),
    ])
    .await;

    let mut config = LoopConfig::new(Instrument::crypto("BTCUSDT").unwrap(), TradeMode::Spot).unwrap();
    config.max_iterations = Some(1);
    let recorder = Arc::new(Recorder::default());

    let mut pipeline = PollingLoop::new(config, Arc::new(binance(addr)), Arc::new(completions(addr)))
        .with_observer(recorder.clone());
    let stats = pipeline.run().await;

    assert_eq!(stats.iterations, 1);
    assert_eq!(stats.outputs, 1);
    assert_eq!(stats.signals, 0);

    let outputs = recorder.outputs.lock().unwrap();
    assert!(matches!(
        outputs[0].outcome,
        Err(InferenceError::Status { status: 500, .. })
    ));
    assert_eq!(
        *recorder.states.lock().unwrap(),
        vec![
            LoopState::Fetching,
            LoopState::Analyzing,
            LoopState::Requesting,
            LoopState::Waiting,
            LoopState::Stopped,
        ]
    );
}

#[tokio::test]
async fn confirm_no_stops_after_one_signal() {
    let reply = json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "```json\n{\"signal\": \"Buy\", \"entry\": \"129.5\", \"stop_loss\": \"125\", \"take_profit\": \"140\", \"asset\": \"BTCUSDT\"}\n```"
            }
        }]
    });
    let addr = serve(vec![
        ("/api/v3/klines", 200, kline_rows(250)),
        ("/v1/chat/completions", 200, reply),
    ])
    .await;

    let config = LoopConfig::new(Instrument::crypto("BTCUSDT").unwrap(), TradeMode::Spot)
        .unwrap()
        .with_run_mode(RunMode::Confirm);
    let recorder = Arc::new(Recorder::default());

    let mut pipeline = PollingLoop::new(config, Arc::new(binance(addr)), Arc::new(completions(addr)))
        .with_prompt(Arc::new(Answer(false)))
        .with_observer(recorder.clone());
    let stats = pipeline.run().await;

    assert_eq!(pipeline.state(), LoopState::Stopped);
    assert_eq!((stats.iterations, stats.outputs, stats.signals), (1, 1, 1));

    let outputs = recorder.outputs.lock().unwrap();
    let response = outputs[0].outcome.as_ref().unwrap();
    let rec = response.recommendation.as_ref().unwrap();
    assert_eq!(rec.entry.map(|d| d.to_string()).as_deref(), Some("129.5"));
    assert_eq!(rec.asset.as_deref(), Some("BTCUSDT"));
}
