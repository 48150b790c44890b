//! Durable chat state: the user directory and the append-only message log.
//!
//! Every operation checks a connection out of the shared pool and returns it when the
//! call ends, whichever way it ends. Nothing here retries.

mod model;

use sqlx::{pool::PoolConnection, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

use crate::{identity::Profile, poll::MessageSource, AppError, AppResult};

pub use model::{Message, UserEntry};

pub const RECENT_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct MessageStore {
    db_pool: SqlitePool,
}

impl MessageStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(AppError::StoreUnavailable)?;
        Ok(Self::new(db_pool))
    }

    /// Closes the pool; later operations fail with `StoreUnavailable`.
    pub async fn close(&self) {
        self.db_pool.close().await;
    }

    async fn checkout(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.db_pool.acquire().await.map_err(AppError::StoreUnavailable)
    }

    pub async fn migrate(&self) -> AppResult<()> {
        let mut conn = self.checkout().await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                hash TEXT PRIMARY KEY NOT NULL,
                nick TEXT NOT NULL,
                nicknameColor TEXT NOT NULL,
                profileImage TEXT NOT NULL
            )",
        )
        .execute(&mut *conn)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                no INTEGER PRIMARY KEY AUTOINCREMENT,
                writer TEXT NOT NULL,
                type TEXT NOT NULL,
                data TEXT NOT NULL,
                date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Inserts or replaces the directory entry for `handle`.
    pub async fn upsert_user(&self, handle: &str, profile: &Profile) -> AppResult<u64> {
        let mut conn = self.checkout().await?;
        let affected = sqlx::query(
            "INSERT INTO users (hash,nick,nicknameColor,profileImage) VALUES (?,?,?,?)
             ON CONFLICT(hash) DO UPDATE SET
                nick=excluded.nick,
                nicknameColor=excluded.nicknameColor,
                profileImage=excluded.profileImage",
        )
        .bind(handle)
        .bind(&profile.nick)
        .bind(&profile.nickname_color)
        .bind(&profile.profile_image)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::bad_parameters());
        }
        Ok(affected)
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserEntry>> {
        let mut conn = self.checkout().await?;
        Ok(sqlx::query_as("SELECT hash,nick,nicknameColor,profileImage FROM users")
            .fetch_all(&mut *conn)
            .await?)
    }

    /// Newest `limit` messages, newest first.
    pub async fn recent_messages(&self, limit: i64) -> AppResult<Vec<Message>> {
        let mut conn = self.checkout().await?;
        Ok(sqlx::query_as("SELECT no,writer,type,data,date FROM messages ORDER BY no DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?)
    }

    /// Every message after `watermark`, newest first.
    pub async fn messages_since(&self, watermark: i64) -> AppResult<Vec<Message>> {
        let mut conn = self.checkout().await?;
        Ok(sqlx::query_as("SELECT no,writer,type,data,date FROM messages WHERE no>? ORDER BY no DESC")
            .bind(watermark)
            .fetch_all(&mut *conn)
            .await?)
    }

    /// Appends a message and returns its sequence number.
    pub async fn insert_message(&self, writer: &str, kind: &str, data: &str) -> AppResult<i64> {
        let mut conn = self.checkout().await?;
        let result = sqlx::query("INSERT INTO messages (writer,type,data) VALUES (?,?,?)")
            .bind(writer)
            .bind(kind)
            .bind(data)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_parameters());
        }
        Ok(result.last_insert_rowid())
    }
}

impl MessageSource for MessageStore {
    async fn messages_since(&self, watermark: i64) -> AppResult<Vec<Message>> {
        MessageStore::messages_since(self, watermark).await
    }
}
