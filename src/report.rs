// Renders chart-ready rows into aligned text tables for the log.
use crate::model::{
    AchievementCount, DailyCount, DailyRevenue, ForecastPoint, InventoryForecast, SpenderTotal,
};

pub fn daily_active_table(rows: &[DailyCount]) -> String {
    if rows.is_empty() {
        return "  (no logins in window)".to_string();
    }
    rows.iter()
        .map(|row| format!("  {}  {:>5} active", row.day, row.active_users))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn daily_revenue_table(rows: &[DailyRevenue]) -> String {
    if rows.is_empty() {
        return "  (no transactions in window)".to_string();
    }
    rows.iter()
        .map(|row| format!("  {}  {:>10.2} $", row.day, row.revenue))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn top_spenders_table(rows: &[SpenderTotal]) -> String {
    if rows.is_empty() {
        return "  (no spenders in window)".to_string();
    }
    rows.iter()
        .enumerate()
        .map(|(rank, row)| {
            format!(
                "  #{:<2} {:<12} {:>10.2} $",
                rank + 1,
                row.username,
                row.total_spent
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn achievement_table(rows: &[AchievementCount]) -> String {
    if rows.is_empty() {
        return "  (no unlocks in window)".to_string();
    }
    rows.iter()
        .map(|row| format!("  {:<16} {:>5}", row.achievement.name(), row.count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn forecast_table(points: &[ForecastPoint]) -> String {
    points
        .iter()
        .map(|point| format!("  {}  {:>10.2}", point.date, point.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stockout_table(rows: &[InventoryForecast]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "  {:<10} stock {:>4} | predicted sales {:>6.2}/day | stockout: {}",
                row.item.name(),
                row.current_stock,
                row.mean_daily_sales,
                row.stockout
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
