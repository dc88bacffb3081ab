mod analyzer;
mod config;
mod generator;
mod model;
mod report;
mod source;
mod storage;
mod utils;

use analyzer::{aggregates, forecast};
use chrono::{Duration, Utc};
use config::{load_config, AppConfig, DataSource};
use futures::future::join_all;
use model::{DateRange, MerchItem, StockoutEstimate};
use source::{FactSource, SqliteFactSource, SyntheticFactSource};
use std::sync::Arc;
use storage::SqliteStorage;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Initialize storage (SQLite) with async access (wrapped in a Mutex)
    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    info!("🚀 MerchPulse started");

    // The engine is fed either a fresh synthetic snapshot or the archived one
    let fact_source: Box<dyn FactSource> = match config.data_source {
        DataSource::Synthetic => Box::new(SyntheticFactSource::new(
            config.dataset.clone(),
            storage.clone(),
        )),
        DataSource::Stored => Box::new(SqliteFactSource::new(storage.clone())),
    };

    info!("Loading fact tables...");
    let facts = match fact_source.load_facts().await {
        Ok(facts) => Arc::new(facts),
        Err(e) => {
            error!("Failed to load fact tables: {:?}", e);
            return;
        }
    };

    let now = Utc::now();
    let window = DateRange::new(now - Duration::days(config.window_days), now);
    info!(
        "Analysis window: {} .. {}",
        window.start.date_naive(),
        window.end.date_naive()
    );

    let daily_active = aggregates::daily_active_users(&facts.logins, &window);
    info!(
        "Daily active users:\n{}",
        report::daily_active_table(&daily_active)
    );

    let revenue = aggregates::daily_revenue(&facts.transactions, &window);
    info!("Daily revenue:\n{}", report::daily_revenue_table(&revenue));

    let spenders = aggregates::top_spenders(
        &facts.transactions,
        &facts.users,
        config.top_spenders,
        &window,
    );
    info!(
        "Top {} spenders:\n{}",
        config.top_spenders,
        report::top_spenders_table(&spenders)
    );

    let unlock_counts = aggregates::achievement_counts(&facts.unlocks, &window);
    info!(
        "Achievements unlocked:\n{}",
        report::achievement_table(&unlock_counts)
    );

    let top_unlocks = aggregates::top_achievements(&facts.unlocks, config.top_achievements, &window);
    info!(
        "Top {} achievements:\n{}",
        config.top_achievements,
        report::achievement_table(&top_unlocks)
    );

    let revenue_forecast = forecast::forecast_revenue(&facts.transactions, &window);
    info!(
        "Revenue forecast (next {} days):\n{}",
        forecast::FORECAST_HORIZON_DAYS,
        report::forecast_table(&revenue_forecast)
    );

    // Forecast every item's depletion concurrently
    let tasks: Vec<_> = MerchItem::ALL
        .iter()
        .map(|&item| {
            let facts = facts.clone();
            let config = config.clone();
            async move {
                forecast::forecast_inventory(
                    &facts.transactions,
                    item,
                    config.initial_stock_for(item),
                    &window,
                )
            }
        })
        .collect();
    let inventory = join_all(tasks).await;

    for item_forecast in &inventory {
        if item_forecast.stockout == StockoutEstimate::AlreadyZero {
            warn!("{} is out of stock", item_forecast.item);
        }
    }
    info!(
        "Inventory outlook (next {} days):\n{}",
        forecast::FORECAST_HORIZON_DAYS,
        report::stockout_table(&inventory)
    );

    info!("Report complete");
}
