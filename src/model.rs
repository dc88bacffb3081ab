// Core structs: fact tables, result rows, catalogues
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The six merchandise items the shop sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MerchItem {
    #[serde(rename = "T-Shirt")]
    TShirt,
    Hoodie,
    Cap,
    Poster,
    Sticker,
    #[serde(rename = "Tote Bag")]
    ToteBag,
}

impl MerchItem {
    pub const ALL: [MerchItem; 6] = [
        MerchItem::TShirt,
        MerchItem::Hoodie,
        MerchItem::Cap,
        MerchItem::Poster,
        MerchItem::Sticker,
        MerchItem::ToteBag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MerchItem::TShirt => "T-Shirt",
            MerchItem::Hoodie => "Hoodie",
            MerchItem::Cap => "Cap",
            MerchItem::Poster => "Poster",
            MerchItem::Sticker => "Sticker",
            MerchItem::ToteBag => "Tote Bag",
        }
    }

    pub fn from_name(name: &str) -> Option<MerchItem> {
        MerchItem::ALL.iter().copied().find(|item| item.name() == name)
    }
}

impl fmt::Display for MerchItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six achievements users can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    #[serde(rename = "First Order")]
    FirstOrder,
    #[serde(rename = "Big Spender")]
    BigSpender,
    Collector,
    #[serde(rename = "Loyal Customer")]
    LoyalCustomer,
    #[serde(rename = "Active User")]
    ActiveUser,
    #[serde(rename = "Social Activist")]
    SocialActivist,
}

impl Achievement {
    pub const ALL: [Achievement; 6] = [
        Achievement::FirstOrder,
        Achievement::BigSpender,
        Achievement::Collector,
        Achievement::LoyalCustomer,
        Achievement::ActiveUser,
        Achievement::SocialActivist,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstOrder => "First Order",
            Achievement::BigSpender => "Big Spender",
            Achievement::Collector => "Collector",
            Achievement::LoyalCustomer => "Loyal Customer",
            Achievement::ActiveUser => "Active User",
            Achievement::SocialActivist => "Social Activist",
        }
    }

    pub fn from_name(name: &str) -> Option<Achievement> {
        Achievement::ALL.iter().copied().find(|a| a.name() == name)
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_date: DateTime<Utc>,
    pub user_id: i64,
    pub item: MerchItem,
    pub quantity: i64,
    pub price_each: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginEvent {
    pub login_date: DateTime<Utc>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementUnlock {
    pub unlock_date: DateTime<Utc>,
    pub user_id: i64,
    pub achievement: Achievement,
}

/// One snapshot of the four fact tables.
#[derive(Debug, Clone, Default)]
pub struct FactTables {
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub logins: Vec<LoginEvent>,
    pub unlocks: Vec<AchievementUnlock>,
}

/// Closed interval [start, end]. An inverted range (start > end) is valid
/// input and filters everything out.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub active_users: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpenderTotal {
    pub user_id: i64,
    pub username: String,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCount {
    pub achievement: Achievement,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Projected depletion of one item's stock over the forecast horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryForecast {
    pub item: MerchItem,
    pub current_stock: i64,
    pub mean_daily_sales: f64,
    pub depletion: Vec<ForecastPoint>,
    pub stockout: StockoutEstimate,
}

/// Days until an item's stock runs out, or a sentinel when the quotient is
/// meaningless.
#[derive(Debug, Clone, PartialEq)]
pub enum StockoutEstimate {
    AlreadyZero,
    NegligibleSales,
    Days(f64),
}

impl fmt::Display for StockoutEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockoutEstimate::AlreadyZero => f.write_str("already zero"),
            StockoutEstimate::NegligibleSales => f.write_str("negligible sales"),
            StockoutEstimate::Days(days) => write!(f, "{days:.1} days"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
