use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{CandleSource, Config, JsonCandleFile};
use strategy::{CandleSeries, IndicatorFileConfig, SignalEngine, Strategy};

fn main() -> anyhow::Result<()> {
    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env()?;

    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .with_context(|| format!("invalid log level '{}'", cfg.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(
        pair = %cfg.pair,
        timeframe = %cfg.timeframe,
        limit = cfg.data_limit,
        "Sentinel starting"
    );

    // ── Engine ────────────────────────────────────────────────────────────────
    let params = IndicatorFileConfig::load(&cfg.indicator_config_path)?;
    let engine = SignalEngine::new(params)?;

    // ── Candle window ─────────────────────────────────────────────────────────
    let source = JsonCandleFile::new(&cfg.candle_file);
    let candles = source.fetch(&cfg.pair, cfg.timeframe, cfg.data_limit)?;
    let series = CandleSeries::new(candles, cfg.timeframe)?;
    info!(
        first = %series.candles()[0].timestamp,
        last = %series.candles()[series.len() - 1].timestamp,
        rows = series.len(),
        timeframe = %series.timeframe(),
        "Candle window validated"
    );

    // ── Evaluation cycle ──────────────────────────────────────────────────────
    let analysis = engine
        .analyze(&series)
        .with_context(|| format!("analysis failed for {} {}", cfg.pair, cfg.timeframe))?;

    info!(strategy = engine.name(), signal = %analysis.event.kind, "\n{analysis}");
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
