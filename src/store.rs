//! Per-user progress kept in PostgreSQL.
//!
//! Every user gets one row in `users`; every finished session appends one row
//! to `user_scores`. A user's current progress is their newest score row.

use log::{debug, info};
use postgres::{Client, NoTls};

use crate::config::StoreConfig;
use crate::error::StoreError;

const CREATE_USERS: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(50) UNIQUE NOT NULL
    );";

const CREATE_USER_SCORES: &str = "
    CREATE TABLE IF NOT EXISTS user_scores (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        level INTEGER DEFAULT 1,
        score INTEGER DEFAULT 0
    );";

pub type UserId = i32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub level: i32,
    pub score: i32,
}

impl Default for Progress {
    fn default() -> Self {
        Progress { level: 1, score: 0 }
    }
}

pub trait ProgressStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError>;
    fn get_or_create_user(&mut self, username: &str) -> Result<UserId, StoreError>;
    /// Newest saved progress, or the default for a user with no sessions yet.
    fn latest_progress(&mut self, user: UserId) -> Result<Progress, StoreError>;
    fn append_progress(&mut self, user: UserId, progress: Progress) -> Result<(), StoreError>;
}

pub struct PgStore {
    client: Client,
}

impl PgStore {
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = config.to_pg_config().connect(NoTls).map_err(StoreError::Connect)?;
        info!("connected to {}:{}/{}", config.host, config.port, config.dbname);
        Ok(PgStore { client })
    }
}

// Each operation runs in its own transaction; dropping it without commit rolls back.
impl ProgressStore for PgStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        let mut tx = self.client.transaction()?;
        tx.batch_execute(CREATE_USERS)?;
        tx.batch_execute(CREATE_USER_SCORES)?;
        tx.commit()?;
        debug!("schema ready");
        Ok(())
    }

    fn get_or_create_user(&mut self, username: &str) -> Result<UserId, StoreError> {
        let mut tx = self.client.transaction()?;

        if let Some(row) = tx.query_opt("SELECT id FROM users WHERE username = $1", &[&username])? {
            return Ok(row.get(0));
        }

        let row = tx.query_one("INSERT INTO users (username) VALUES ($1) RETURNING id", &[&username])?;
        let id: UserId = row.get(0);
        tx.commit()?;
        info!("created user {:?} with id {}", username, id);
        Ok(id)
    }

    fn latest_progress(&mut self, user: UserId) -> Result<Progress, StoreError> {
        let mut tx = self.client.transaction()?;
        let row = tx.query_opt(
            "SELECT level, score FROM user_scores WHERE user_id = $1 ORDER BY id DESC LIMIT 1",
            &[&user],
        )?;
        tx.commit()?;

        // Columns are nullable; fall back to their defaults.
        Ok(row.map_or_else(Progress::default, |row| {
            let defaults = Progress::default();
            Progress {
                level: row.get::<_, Option<i32>>(0).unwrap_or(defaults.level),
                score: row.get::<_, Option<i32>>(1).unwrap_or(defaults.score),
            }
        }))
    }

    fn append_progress(&mut self, user: UserId, progress: Progress) -> Result<(), StoreError> {
        let mut tx = self.client.transaction()?;
        tx.execute(
            "INSERT INTO user_scores (user_id, level, score) VALUES ($1, $2, $3)",
            &[&user, &progress.level, &progress.score],
        )?;
        tx.commit()?;
        info!("saved level {} score {} for user {}", progress.level, progress.score, user);
        Ok(())
    }
}
