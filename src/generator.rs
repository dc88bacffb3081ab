use crate::config::DatasetConfig;
use crate::model::{Achievement, AchievementUnlock, FactTables, LoginEvent, MerchItem, Transaction, User};
use crate::utils::round2;
use chrono::{DateTime, Duration, Utc};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

const REGISTRATION_LOOKBACK_DAYS: i64 = 365;
const QUANTITY_CHOICES: [i64; 3] = [1, 2, 3];
const QUANTITY_WEIGHTS: [u32; 3] = [7, 2, 1];
const UNIT_PRICE_MIN: f64 = 10.0;
const UNIT_PRICE_MAX: f64 = 100.0;

/// Produces synthetic but internally consistent fact tables: every event is
/// dated between its user's registration and the anchor. Deterministic for a
/// fixed (seed, anchor) pair.
pub struct DatasetGenerator {
    rng: StdRng,
    anchor: DateTime<Utc>,
    quantity_dist: WeightedIndex<u32>,
}

impl DatasetGenerator {
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        let quantity_dist =
            WeightedIndex::new(QUANTITY_WEIGHTS).expect("quantity weights are non-zero");
        Self {
            rng: StdRng::seed_from_u64(seed),
            anchor,
            quantity_dist,
        }
    }

    /// All four fact tables in one snapshot, sized per the config.
    pub fn dataset(&mut self, cfg: &DatasetConfig) -> FactTables {
        let users = self.users(cfg.users);
        let transactions = self.transactions(&users, cfg.transactions);
        let logins = self.login_events(&users, cfg.logins);
        let unlocks = self.achievement_unlocks(&users, cfg.unlocks);
        debug!(
            "generated {} users, {} transactions, {} logins, {} unlocks",
            users.len(),
            transactions.len(),
            logins.len(),
            unlocks.len()
        );
        FactTables {
            users,
            transactions,
            logins,
            unlocks,
        }
    }

    pub fn users(&mut self, count: usize) -> Vec<User> {
        let base = self.anchor - Duration::days(REGISTRATION_LOOKBACK_DAYS);
        (1..=count as i64)
            .map(|user_id| User {
                user_id,
                username: format!("user_{user_id}"),
                registration_date: base
                    + Duration::days(self.rng.random_range(0..=REGISTRATION_LOOKBACK_DAYS)),
            })
            .collect()
    }

    pub fn transactions(&mut self, users: &[User], count: usize) -> Vec<Transaction> {
        (0..count)
            .filter_map(|_| {
                let user = users.choose(&mut self.rng)?;
                let transaction_date = self.event_date(user.registration_date);
                let item = *MerchItem::ALL.choose(&mut self.rng)?;
                let quantity = QUANTITY_CHOICES[self.quantity_dist.sample(&mut self.rng)];
                let price_each = round2(self.rng.random_range(UNIT_PRICE_MIN..=UNIT_PRICE_MAX));
                Some(Transaction {
                    transaction_date,
                    user_id: user.user_id,
                    item,
                    quantity,
                    price_each,
                    total_amount: round2(price_each * quantity as f64),
                })
            })
            .collect()
    }

    pub fn login_events(&mut self, users: &[User], count: usize) -> Vec<LoginEvent> {
        (0..count)
            .filter_map(|_| {
                let user = users.choose(&mut self.rng)?;
                Some(LoginEvent {
                    login_date: self.event_date(user.registration_date),
                    user_id: user.user_id,
                })
            })
            .collect()
    }

    pub fn achievement_unlocks(&mut self, users: &[User], count: usize) -> Vec<AchievementUnlock> {
        (0..count)
            .filter_map(|_| {
                let user = users.choose(&mut self.rng)?;
                let unlock_date = self.event_date(user.registration_date);
                let achievement = *Achievement::ALL.choose(&mut self.rng)?;
                Some(AchievementUnlock {
                    unlock_date,
                    user_id: user.user_id,
                    achievement,
                })
            })
            .collect()
    }

    // Uniform day offset in 0..=max(1, days between registration and anchor),
    // so no event predates its user's registration.
    fn event_date(&mut self, registered: DateTime<Utc>) -> DateTime<Utc> {
        let since_registration = (self.anchor - registered).num_days();
        registered + Duration::days(self.rng.random_range(0..=since_registration.max(1)))
    }
}
