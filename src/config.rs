use crate::model::MerchItem;
use serde::Deserialize;
use std::fs;

/// Items missing from `stock_levels` fall back to this stock figure.
pub const DEFAULT_INITIAL_STOCK: i64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub seed: u64,
    pub users: usize,
    pub transactions: usize,
    pub logins: usize,
    pub unlocks: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockConfig {
    pub item: MerchItem,
    pub initial_stock: i64,
}

/// Where the analysis run takes its fact tables from.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Synthetic,
    Stored,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db_path: String,
    pub data_source: DataSource,
    pub dataset: DatasetConfig,
    pub window_days: i64,
    pub top_spenders: usize,
    pub top_achievements: usize,
    pub stock_levels: Vec<StockConfig>,
}

impl AppConfig {
    pub fn initial_stock_for(&self, item: MerchItem) -> i64 {
        self.stock_levels
            .iter()
            .find(|level| level.item == item)
            .map(|level| level.initial_stock)
            .unwrap_or(DEFAULT_INITIAL_STOCK)
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
