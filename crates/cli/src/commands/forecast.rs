//! `storepilot forecast`: Short-horizon sales forecast from imported facts.

use chrono::{Duration, Local, NaiveDate};
use storepilot_config::AppConfig;
use storepilot_core::intent::ForecastIntent;
use storepilot_core::store::FactStore;
use storepilot_pipeline::DateRange;

use super::{CmdResult, ProductArgs, build_pipeline, context_with_parameters, load_config, open_store, report};

pub struct ForecastArgs {
    pub identifier: String,
    pub spec: Option<String>,
    pub factors: Option<String>,
    pub horizon: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub product: ProductArgs,
    pub params: Vec<(String, String)>,
    pub json: bool,
}

/// Resolve the history window: `end` defaults to today, `start` to
/// `lookback_days` before `end`.
pub fn resolve_range(
    config: &AppConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> DateRange {
    let end = end.unwrap_or(today);
    let start =
        start.unwrap_or_else(|| end - Duration::days(i64::from(config.forecast.lookback_days)));
    DateRange::new(
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}

pub async fn run(args: ForecastArgs) -> CmdResult {
    let config = load_config()?;
    let pipeline = build_pipeline(&config)?;
    let store = open_store(&config);

    let range = resolve_range(&config, args.start, args.end, Local::now().date_naive());
    let rows = store.query_fact_rows(&range.start, &range.end).await?;

    let intent = ForecastIntent {
        identifier: args.identifier,
        spec: args.spec.unwrap_or_default(),
        factors: args.factors.unwrap_or_default(),
        horizon_days: args.horizon.unwrap_or(config.forecast.horizon_days),
    };
    let context = context_with_parameters(args.product.into_attributes(), args.params);

    println!(
        "📈 Forecasting {} from {} to {} ({} fact rows in range)",
        intent.identifier,
        range.start,
        range.end,
        rows.len()
    );

    let forecast = pipeline
        .forecast(intent, &rows, &range, context)
        .await
        .inspect_err(report)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
        return Ok(());
    }

    println!("\n  Summary:  {}", forecast.summary);
    println!("  Analysis: {}\n", forecast.analysis);
    if forecast.declined() {
        println!("  ⚠️  The model declined to forecast from this history.");
    } else {
        for point in &forecast.forecast {
            println!("  {}  {:>10.1}", point.date, point.predicted_sales);
        }
        println!("  ──────────────────────");
        println!("  Total       {:>10.1}", forecast.total_predicted_sales());
    }
    Ok(())
}
