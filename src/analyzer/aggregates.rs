use crate::model::{
    Achievement, AchievementCount, AchievementUnlock, DailyCount, DailyRevenue, DateRange,
    LoginEvent, SpenderTotal, Transaction, User,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Distinct users that logged in per calendar day, ascending by day.
pub fn daily_active_users(logins: &[LoginEvent], range: &DateRange) -> Vec<DailyCount> {
    if range.is_inverted() {
        return Vec::new();
    }
    let mut by_day: BTreeMap<NaiveDate, HashSet<i64>> = BTreeMap::new();
    for login in logins.iter().filter(|l| range.contains(l.login_date)) {
        by_day
            .entry(login.login_date.date_naive())
            .or_default()
            .insert(login.user_id);
    }
    by_day
        .into_iter()
        .map(|(day, users)| DailyCount {
            day,
            active_users: users.len() as u64,
        })
        .collect()
}

/// Summed transaction totals per calendar day, ascending by day.
pub fn daily_revenue(transactions: &[Transaction], range: &DateRange) -> Vec<DailyRevenue> {
    if range.is_inverted() {
        return Vec::new();
    }
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| range.contains(t.transaction_date)) {
        *by_day.entry(tx.transaction_date.date_naive()).or_insert(0.0) += tx.total_amount;
    }
    by_day
        .into_iter()
        .map(|(day, revenue)| DailyRevenue { day, revenue })
        .collect()
}

/// Top `n` users by summed spend, descending. Usernames are resolved by a
/// hash-join on user_id; transactions without a matching user are dropped.
/// Order among users with equal totals is unspecified.
pub fn top_spenders(
    transactions: &[Transaction],
    users: &[User],
    n: usize,
    range: &DateRange,
) -> Vec<SpenderTotal> {
    if n == 0 || range.is_inverted() {
        return Vec::new();
    }
    let by_id: HashMap<i64, &User> = users.iter().map(|u| (u.user_id, u)).collect();
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for tx in transactions.iter().filter(|t| range.contains(t.transaction_date)) {
        *totals.entry(tx.user_id).or_insert(0.0) += tx.total_amount;
    }
    let mut rows: Vec<SpenderTotal> = totals
        .into_iter()
        .filter_map(|(user_id, total_spent)| {
            by_id.get(&user_id).map(|user| SpenderTotal {
                user_id,
                username: user.username.clone(),
                total_spent,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    rows.truncate(n);
    rows
}

/// Unlock counts per achievement, descending by count. Order among equal
/// counts is unspecified.
pub fn achievement_counts(unlocks: &[AchievementUnlock], range: &DateRange) -> Vec<AchievementCount> {
    if range.is_inverted() {
        return Vec::new();
    }
    let mut counts: HashMap<Achievement, u64> = HashMap::new();
    for unlock in unlocks.iter().filter(|u| range.contains(u.unlock_date)) {
        *counts.entry(unlock.achievement).or_insert(0) += 1;
    }
    let mut rows: Vec<AchievementCount> = counts
        .into_iter()
        .map(|(achievement, count)| AchievementCount { achievement, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// The `n` most unlocked achievements.
pub fn top_achievements(
    unlocks: &[AchievementUnlock],
    n: usize,
    range: &DateRange,
) -> Vec<AchievementCount> {
    if n == 0 {
        return Vec::new();
    }
    let mut rows = achievement_counts(unlocks, range);
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MerchItem;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn march() -> DateRange {
        DateRange::new(ts(1, 0), ts(31, 23))
    }

    fn user(user_id: i64) -> User {
        User {
            user_id,
            username: format!("user_{user_id}"),
            registration_date: ts(1, 0),
        }
    }

    fn tx(day: u32, user_id: i64, item: MerchItem, quantity: i64, price_each: f64) -> Transaction {
        Transaction {
            transaction_date: ts(day, 12),
            user_id,
            item,
            quantity,
            price_each,
            total_amount: price_each * quantity as f64,
        }
    }

    fn login(day: u32, hour: u32, user_id: i64) -> LoginEvent {
        LoginEvent {
            login_date: ts(day, hour),
            user_id,
        }
    }

    fn unlock(day: u32, user_id: i64, achievement: Achievement) -> AchievementUnlock {
        AchievementUnlock {
            unlock_date: ts(day, 12),
            user_id,
            achievement,
        }
    }

    #[test]
    fn daily_active_users_counts_distinct_per_day() {
        let logins = vec![
            login(1, 8, 1),
            login(1, 20, 1), // same user again, same day
            login(1, 9, 2),
            login(3, 9, 1),
        ];
        let rows = daily_active_users(&logins, &march());
        assert_eq!(
            rows,
            vec![
                DailyCount { day: ts(1, 0).date_naive(), active_users: 2 },
                DailyCount { day: ts(3, 0).date_naive(), active_users: 1 },
            ]
        );
    }

    #[test]
    fn daily_revenue_sums_match_input_within_range() {
        let transactions = vec![
            tx(1, 1, MerchItem::Cap, 1, 20.0),
            tx(1, 2, MerchItem::Hoodie, 2, 45.0),
            tx(5, 1, MerchItem::Poster, 1, 15.0),
        ];
        let rows = daily_revenue(&transactions, &march());
        let total: f64 = rows.iter().map(|r| r.revenue).sum();
        let expected: f64 = transactions.iter().map(|t| t.total_amount).sum();
        assert!((total - expected).abs() < 1e-9);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].day < rows[1].day);
    }

    #[test]
    fn range_filter_excludes_outside_days() {
        let transactions = vec![
            tx(1, 1, MerchItem::Cap, 1, 20.0),
            tx(20, 1, MerchItem::Cap, 1, 30.0),
        ];
        let narrow = DateRange::new(ts(1, 0), ts(2, 0));
        let rows = daily_revenue(&transactions, &narrow);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].revenue - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_and_inverted_range_yield_empty() {
        assert!(daily_active_users(&[], &march()).is_empty());
        let inverted = DateRange::new(ts(31, 0), ts(1, 0));
        let transactions = vec![tx(5, 1, MerchItem::Cap, 1, 20.0)];
        assert!(daily_revenue(&transactions, &inverted).is_empty());
        assert!(top_spenders(&transactions, &[user(1)], 5, &inverted).is_empty());
    }

    #[test]
    fn top_spenders_sorted_and_capped() {
        let users = vec![user(1), user(2), user(3)];
        let transactions = vec![
            tx(1, 1, MerchItem::Cap, 1, 10.0),
            tx(2, 2, MerchItem::Hoodie, 1, 90.0),
            tx(3, 3, MerchItem::Poster, 1, 50.0),
            tx(4, 1, MerchItem::Cap, 1, 15.0),
        ];
        let rows = top_spenders(&transactions, &users, 2, &march());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "user_2");
        assert_eq!(rows[1].username, "user_3");
        assert!(rows[0].total_spent >= rows[1].total_spent);
    }

    #[test]
    fn top_spenders_returns_at_most_distinct_users() {
        let users = vec![user(1)];
        let transactions = vec![tx(1, 1, MerchItem::Cap, 1, 10.0)];
        assert_eq!(top_spenders(&transactions, &users, 10, &march()).len(), 1);
        assert!(top_spenders(&transactions, &users, 0, &march()).is_empty());
    }

    #[test]
    fn top_spenders_drops_unknown_users() {
        let users = vec![user(1)];
        let transactions = vec![
            tx(1, 1, MerchItem::Cap, 1, 10.0),
            tx(2, 99, MerchItem::Cap, 1, 500.0), // no such user
        ];
        let rows = top_spenders(&transactions, &users, 10, &march());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, 1);
    }

    #[test]
    fn achievement_counts_descending() {
        let unlocks = vec![
            unlock(1, 1, Achievement::FirstOrder),
            unlock(2, 2, Achievement::FirstOrder),
            unlock(3, 3, Achievement::Collector),
        ];
        let rows = achievement_counts(&unlocks, &march());
        assert_eq!(rows[0].achievement, Achievement::FirstOrder);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 1);

        let top = top_achievements(&unlocks, 1, &march());
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].achievement, Achievement::FirstOrder);
    }
}
