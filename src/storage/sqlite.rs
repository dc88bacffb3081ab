use crate::model::{
    Achievement, AchievementUnlock, LoginEvent, MerchItem, StorageError, Transaction, User,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

/// Archive of the four fact tables. One snapshot lives here at a time; a new
/// synthetic run replaces the previous one via `clear_facts`.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the fact tables if they are missing.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                registration_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS transactions (
                transaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_date TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                item TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                price_each REAL NOT NULL,
                total_amount REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS login_events (
                login_id INTEGER PRIMARY KEY AUTOINCREMENT,
                login_date TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(user_id)
            );

            CREATE TABLE IF NOT EXISTS achievement_unlocks (
                unlock_id INTEGER PRIMARY KEY AUTOINCREMENT,
                unlock_date TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                achievement TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Empties all fact tables before a fresh snapshot is archived.
    pub fn clear_facts(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "
            DELETE FROM achievement_unlocks;
            DELETE FROM login_events;
            DELETE FROM transactions;
            DELETE FROM users;
            ",
        )?;
        Ok(())
    }

    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO users (user_id, username, registration_date)
             VALUES (?1, ?2, ?3)",
            params![
                &user.user_id,
                &user.username,
                &user.registration_date.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn save_transaction(&self, tx: &Transaction) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO transactions (
                transaction_date, user_id, item, quantity, price_each, total_amount
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &tx.transaction_date.to_rfc3339(),
                &tx.user_id,
                tx.item.name(),
                &tx.quantity,
                &tx.price_each,
                &tx.total_amount,
            ],
        )?;
        Ok(())
    }

    pub fn save_login_event(&self, login: &LoginEvent) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO login_events (login_date, user_id) VALUES (?1, ?2)",
            params![&login.login_date.to_rfc3339(), &login.user_id],
        )?;
        Ok(())
    }

    pub fn save_achievement_unlock(&self, unlock: &AchievementUnlock) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO achievement_unlocks (unlock_date, user_id, achievement)
             VALUES (?1, ?2, ?3)",
            params![
                &unlock.unlock_date.to_rfc3339(),
                &unlock.user_id,
                unlock.achievement.name(),
            ],
        )?;
        Ok(())
    }

    pub fn load_users(&self) -> Result<Vec<User>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, username, registration_date FROM users ORDER BY user_id ASC",
        )?;
        let rows = stmt.query_map([], Self::map_user)?;
        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_date, user_id, item, quantity, price_each, total_amount
             FROM transactions ORDER BY transaction_date ASC",
        )?;
        let rows = stmt.query_map([], Self::map_transaction)?;
        let mut transactions = Vec::new();
        for tx in rows {
            transactions.push(tx?);
        }
        Ok(transactions)
    }

    pub fn load_login_events(&self) -> Result<Vec<LoginEvent>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT login_date, user_id FROM login_events ORDER BY login_date ASC",
        )?;
        let rows = stmt.query_map([], Self::map_login)?;
        let mut logins = Vec::new();
        for login in rows {
            logins.push(login?);
        }
        Ok(logins)
    }

    pub fn load_achievement_unlocks(&self) -> Result<Vec<AchievementUnlock>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT unlock_date, user_id, achievement
             FROM achievement_unlocks ORDER BY unlock_date ASC",
        )?;
        let rows = stmt.query_map([], Self::map_unlock)?;
        let mut unlocks = Vec::new();
        for unlock in rows {
            unlocks.push(unlock?);
        }
        Ok(unlocks)
    }

    fn map_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
            registration_date: Self::parse_timestamp(2, row.get(2)?)?,
        })
    }

    fn map_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
        let item_name: String = row.get(2)?;
        let item = MerchItem::from_name(&item_name).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("unknown merch item: {item_name}").into(),
            )
        })?;
        Ok(Transaction {
            transaction_date: Self::parse_timestamp(0, row.get(0)?)?,
            user_id: row.get(1)?,
            item,
            quantity: row.get(3)?,
            price_each: row.get(4)?,
            total_amount: row.get(5)?,
        })
    }

    fn map_login(row: &Row) -> Result<LoginEvent, rusqlite::Error> {
        Ok(LoginEvent {
            login_date: Self::parse_timestamp(0, row.get(0)?)?,
            user_id: row.get(1)?,
        })
    }

    fn map_unlock(row: &Row) -> Result<AchievementUnlock, rusqlite::Error> {
        let achievement_name: String = row.get(2)?;
        let achievement = Achievement::from_name(&achievement_name).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("unknown achievement: {achievement_name}").into(),
            )
        })?;
        Ok(AchievementUnlock {
            unlock_date: Self::parse_timestamp(0, row.get(0)?)?,
            user_id: row.get(1)?,
            achievement,
        })
    }

    fn parse_timestamp(idx: usize, raw: String) -> Result<DateTime<Utc>, rusqlite::Error> {
        raw.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
    }
}
