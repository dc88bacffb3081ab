use crate::analyzer::aggregates;
use crate::analyzer::regression::fit_line;
use crate::model::{
    DateRange, ForecastPoint, InventoryForecast, MerchItem, StockoutEstimate, Transaction,
};
use crate::utils::round1;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Both the revenue and the inventory forecast look this many days ahead.
pub const FORECAST_HORIZON_DAYS: usize = 7;

// Mean predicted daily sales at or below this are reported as negligible
// rather than divided by.
const NEGLIGIBLE_DAILY_SALES: f64 = 0.01;

/// Projected daily revenue for the seven days after the last observed day in
/// the window. Every point is clamped to >= 0.
pub fn forecast_revenue(transactions: &[Transaction], range: &DateRange) -> Vec<ForecastPoint> {
    let daily: Vec<(NaiveDate, f64)> = aggregates::daily_revenue(transactions, range)
        .into_iter()
        .map(|row| (row.day, row.revenue))
        .collect();
    project(&daily, range.end.date_naive())
}

/// Projected stock depletion for one item: the seven predicted daily-sold
/// values subtracted running from the current stock, floored at zero each day.
/// Current stock counts every unit ever sold, not just the analysis window.
pub fn forecast_inventory(
    transactions: &[Transaction],
    item: MerchItem,
    initial_stock: i64,
    range: &DateRange,
) -> InventoryForecast {
    let total_sold: i64 = transactions
        .iter()
        .filter(|t| t.item == item)
        .map(|t| t.quantity)
        .sum();
    let current_stock = (initial_stock - total_sold).max(0);

    let daily_sold = daily_units_sold(transactions, item, range);
    let predicted = project(&daily_sold, range.end.date_naive());

    let mut cumulative = 0.0;
    let depletion: Vec<ForecastPoint> = predicted
        .iter()
        .map(|point| {
            cumulative += point.value;
            ForecastPoint {
                date: point.date,
                value: (current_stock as f64 - cumulative).max(0.0),
            }
        })
        .collect();

    let mean_daily_sales =
        predicted.iter().map(|p| p.value).sum::<f64>() / predicted.len() as f64;
    let stockout = days_to_stockout(current_stock, mean_daily_sales);
    debug!(
        "{item}: stock {current_stock}, mean predicted sales {mean_daily_sales:.2}/day, stockout {stockout}"
    );

    InventoryForecast {
        item,
        current_stock,
        mean_daily_sales,
        depletion,
        stockout,
    }
}

/// Days until the stock runs out at the mean predicted sales rate, rounded to
/// one decimal, with sentinels for empty stock and negligible sales.
pub fn days_to_stockout(current_stock: i64, mean_daily_sales: f64) -> StockoutEstimate {
    if current_stock == 0 {
        StockoutEstimate::AlreadyZero
    } else if mean_daily_sales <= NEGLIGIBLE_DAILY_SALES {
        StockoutEstimate::NegligibleSales
    } else {
        StockoutEstimate::Days(round1(current_stock as f64 / mean_daily_sales))
    }
}

fn daily_units_sold(
    transactions: &[Transaction],
    item: MerchItem,
    range: &DateRange,
) -> Vec<(NaiveDate, f64)> {
    if range.is_inverted() {
        return Vec::new();
    }
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.item == item && range.contains(t.transaction_date))
    {
        *by_day.entry(tx.transaction_date.date_naive()).or_insert(0.0) += tx.quantity as f64;
    }
    by_day.into_iter().collect()
}

/// Extrapolates an ascending daily series seven days past its last
/// observation. No observations flat-line at zero after `fallback_anchor`,
/// a single observation repeats its value, anything more gets a least-squares
/// line over day indices with negative predictions floored at zero.
fn project(series: &[(NaiveDate, f64)], fallback_anchor: NaiveDate) -> Vec<ForecastPoint> {
    match series {
        [] => flat_forecast(fallback_anchor, 0.0),
        [(day, value)] => flat_forecast(*day, *value),
        [(first_day, _), .., (last_day, _)] => {
            let points: Vec<(f64, f64)> = series
                .iter()
                .map(|(day, value)| ((*day - *first_day).num_days() as f64, *value))
                .collect();
            let Some(fit) = fit_line(&points) else {
                // distinct days always vary in x; fall back to the mean
                let mean = points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64;
                return flat_forecast(*last_day, mean);
            };
            let last_index = (*last_day - *first_day).num_days() as f64;
            (1..=FORECAST_HORIZON_DAYS as i64)
                .map(|offset| ForecastPoint {
                    date: *last_day + Duration::days(offset),
                    value: fit.predict(last_index + offset as f64).max(0.0),
                })
                .collect()
        }
    }
}

fn flat_forecast(last_day: NaiveDate, value: f64) -> Vec<ForecastPoint> {
    (1..=FORECAST_HORIZON_DAYS as i64)
        .map(|offset| ForecastPoint {
            date: last_day + Duration::days(offset),
            value: value.max(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        ts(day).date_naive()
    }

    fn march() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap(),
        )
    }

    fn sale(day: u32, item: MerchItem, quantity: i64, price_each: f64) -> Transaction {
        Transaction {
            transaction_date: ts(day),
            user_id: 1,
            item,
            quantity,
            price_each,
            total_amount: price_each * quantity as f64,
        }
    }

    #[test]
    fn linear_revenue_trend_extrapolates() {
        // revenue 10, 20, 30 on consecutive days: slope 10
        let transactions = vec![
            sale(1, MerchItem::Cap, 1, 10.0),
            sale(2, MerchItem::Cap, 1, 20.0),
            sale(3, MerchItem::Cap, 1, 30.0),
        ];
        let forecast = forecast_revenue(&transactions, &march());
        assert_eq!(forecast.len(), FORECAST_HORIZON_DAYS);
        for (i, expected) in [40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0].iter().enumerate() {
            assert_eq!(forecast[i].date, date(4 + i as u32));
            assert!((forecast[i].value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn single_observation_repeats_its_value() {
        let transactions = vec![sale(10, MerchItem::Cap, 1, 55.5)];
        let forecast = forecast_revenue(&transactions, &march());
        assert_eq!(forecast.len(), FORECAST_HORIZON_DAYS);
        for (i, point) in forecast.iter().enumerate() {
            assert_eq!(point.date, date(11 + i as u32));
            assert!((point.value - 55.5).abs() < 1e-9);
        }
    }

    #[test]
    fn no_observations_flat_line_at_zero() {
        let forecast = forecast_revenue(&[], &march());
        assert_eq!(forecast.len(), FORECAST_HORIZON_DAYS);
        assert_eq!(forecast[0].date, date(31) + Duration::days(1));
        assert!(forecast.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn declining_trend_is_floored_at_zero() {
        let transactions = vec![
            sale(1, MerchItem::Cap, 1, 30.0),
            sale(2, MerchItem::Cap, 1, 20.0),
            sale(3, MerchItem::Cap, 1, 10.0),
        ];
        let forecast = forecast_revenue(&transactions, &march());
        assert!(forecast.iter().all(|p| p.value >= 0.0));
        // slope -10 from 30: every predicted day is at or below zero
        assert!(forecast.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn forecast_starts_after_last_included_day() {
        // data through day 20, but the window stops at day 10
        let transactions = vec![
            sale(4, MerchItem::Cap, 1, 10.0),
            sale(5, MerchItem::Cap, 1, 20.0),
            sale(20, MerchItem::Cap, 1, 99.0),
        ];
        let window = DateRange::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 59).unwrap(),
        );
        let forecast = forecast_revenue(&transactions, &window);
        assert_eq!(forecast[0].date, date(6));
    }

    #[test]
    fn depletion_curve_never_negative_and_tracks_cumulative_sales() {
        // flat 3 units/day predicted from a single observed day
        let transactions = vec![sale(10, MerchItem::Hoodie, 3, 40.0)];
        let forecast = forecast_inventory(&transactions, MerchItem::Hoodie, 13, &march());
        // 13 initial - 3 already sold
        assert_eq!(forecast.current_stock, 10);
        let expected = [7.0, 4.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(forecast.depletion.len(), FORECAST_HORIZON_DAYS);
        for (point, expected) in forecast.depletion.iter().zip(expected) {
            assert!((point.value - expected).abs() < 1e-9);
            assert!(point.value >= 0.0);
        }
        assert_eq!(forecast.stockout, StockoutEstimate::Days(3.3));
    }

    #[test]
    fn stockout_sentinel_when_stock_exhausted() {
        let transactions = vec![sale(5, MerchItem::Poster, 50, 15.0)];
        let forecast = forecast_inventory(&transactions, MerchItem::Poster, 50, &march());
        assert_eq!(forecast.current_stock, 0);
        assert_eq!(forecast.stockout, StockoutEstimate::AlreadyZero);
        assert!(forecast.depletion.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn stockout_sentinel_when_no_sales_predicted() {
        let forecast = forecast_inventory(&[], MerchItem::Sticker, 300, &march());
        assert_eq!(forecast.current_stock, 300);
        assert_eq!(forecast.stockout, StockoutEstimate::NegligibleSales);
        assert!(forecast.depletion.iter().all(|p| (p.value - 300.0).abs() < 1e-9));
    }

    #[test]
    fn oversold_stock_clamps_to_zero() {
        // sold more than the configured initial stock
        let transactions = vec![
            sale(1, MerchItem::Poster, 40, 15.0),
            sale(2, MerchItem::Poster, 40, 15.0),
        ];
        let forecast = forecast_inventory(&transactions, MerchItem::Poster, 50, &march());
        assert_eq!(forecast.current_stock, 0);
        assert_eq!(forecast.stockout, StockoutEstimate::AlreadyZero);
    }

    #[test]
    fn current_stock_counts_sales_outside_window() {
        // sale on day 20 sits outside the window but still depletes stock
        let transactions = vec![sale(20, MerchItem::Cap, 5, 10.0)];
        let window = DateRange::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 59).unwrap(),
        );
        let forecast = forecast_inventory(&transactions, MerchItem::Cap, 200, &window);
        assert_eq!(forecast.current_stock, 195);
        // but the regression series is window-restricted: nothing observed
        assert_eq!(forecast.stockout, StockoutEstimate::NegligibleSales);
    }

    #[test]
    fn inverted_range_degrades_to_zero_forecast() {
        let transactions = vec![sale(5, MerchItem::Cap, 1, 10.0)];
        let inverted = DateRange::new(ts(20), ts(1));
        let forecast = forecast_revenue(&transactions, &inverted);
        assert_eq!(forecast.len(), FORECAST_HORIZON_DAYS);
        assert!(forecast.iter().all(|p| p.value == 0.0));
    }
}
