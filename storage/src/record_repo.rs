//! SQLite-backed record store.
//!
//! Uses SqlitePoolManager and the record models. Implements [`RecordStore`] for the dispatcher,
//! plus per-chat listing queries used by the `stats` command and tests.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::{
    FileRecord, MessageRecord, RecordCounts, SearchRecord, SearchRow, UserRecord, UserUpdate,
};
use crate::repository::RecordStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteRecordStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteRecordStore {
    /// Opens (or creates) the database at `database_url` and ensures the schema exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    /// Opens an existing database read-only, without touching the schema. Only read queries
    /// (`find_user`, `counts`, the listings) succeed on it.
    pub async fn open_read_only(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new_read_only(database_url).await?;
        Ok(Self { pool_manager })
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                chat_id INTEGER PRIMARY KEY,
                username TEXT,
                display_name TEXT,
                phone TEXT,
                referral_code TEXT,
                bonus_points INTEGER NOT NULL DEFAULT 0 CHECK (bonus_points >= 0),
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS messages (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                chat_id INTEGER NOT NULL,
                direction TEXT NOT NULL,
                original_text TEXT NOT NULL,
                translated_text TEXT,
                sentiment TEXT,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS files (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                chat_id INTEGER NOT NULL,
                file_id TEXT NOT NULL,
                file_name TEXT NOT NULL,
                media_kind TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS searches (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                chat_id INTEGER NOT NULL,
                query TEXT NOT NULL,
                summary TEXT NOT NULL,
                links TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id);
            CREATE INDEX IF NOT EXISTS idx_files_chat_id ON files(chat_id);
            CREATE INDEX IF NOT EXISTS idx_searches_chat_id ON searches(chat_id);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        self.pool_manager.close().await;
    }

    /// Messages of a chat in insertion order.
    pub async fn list_messages(&self, chat_id: i64) -> Result<Vec<MessageRecord>, StorageError> {
        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, chat_id, direction, original_text, translated_text, sentiment, created_at
            FROM messages WHERE chat_id = ? ORDER BY seq ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        debug!(chat_id, count = messages.len(), "Listed messages");
        Ok(messages)
    }

    /// File records of a chat in insertion order.
    pub async fn list_files(&self, chat_id: i64) -> Result<Vec<FileRecord>, StorageError> {
        let files = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, chat_id, file_id, file_name, media_kind, mime_type, description, created_at
            FROM files WHERE chat_id = ? ORDER BY seq ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(files)
    }

    /// Search records of a chat in insertion order.
    pub async fn list_searches(&self, chat_id: i64) -> Result<Vec<SearchRecord>, StorageError> {
        let rows = sqlx::query_as::<_, SearchRow>(
            r#"
            SELECT id, chat_id, query, summary, links, created_at
            FROM searches WHERE chat_id = ? ORDER BY seq ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        rows.into_iter().map(SearchRecord::try_from).collect()
    }

    async fn count(&self, table: &'static str) -> Result<i64, StorageError> {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(n)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    #[instrument(skip(self))]
    async fn find_user(&self, chat_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT chat_id, username, display_name, phone, referral_code, bonus_points, created_at
            FROM users WHERE chat_id = ?
            "#,
        )
        .bind(chat_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(user)
    }

    #[instrument(skip(self, user), fields(chat_id = user.chat_id))]
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO users (chat_id, username, display_name, phone, referral_code, bonus_points, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.chat_id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.phone)
        .bind(&user.referral_code)
        .bind(user.bonus_points)
        .bind(user.created_at)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return StorageError::AlreadyExists(format!("user {}", user.chat_id));
                }
            }
            StorageError::from(e)
        })?;

        info!(chat_id = user.chat_id, "Saved user");
        Ok(())
    }

    #[instrument(skip(self, update))]
    async fn update_user(&self, chat_id: i64, update: &UserUpdate) -> Result<(), StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET phone = COALESCE(?, phone), referral_code = COALESCE(?, referral_code)
            WHERE chat_id = ?
            "#,
        )
        .bind(&update.phone)
        .bind(&update.referral_code)
        .bind(chat_id)
        .execute(self.pool_manager.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {}", chat_id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn credit_bonus(&self, chat_id: i64, amount: u32) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET bonus_points = bonus_points + ? WHERE chat_id = ?")
            .bind(i64::from(amount))
            .bind(chat_id)
            .execute(self.pool_manager.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {}", chat_id)));
        }
        Ok(())
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat_id, direction = %message.direction))]
    async fn insert_message(&self, message: &MessageRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, direction, original_text, translated_text, sentiment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(message.chat_id)
        .bind(&message.direction)
        .bind(&message.original_text)
        .bind(&message.translated_text)
        .bind(&message.sentiment)
        .bind(message.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(id = %message.id, direction = %message.direction, "Saved message");
        Ok(())
    }

    #[instrument(skip(self, file), fields(chat_id = file.chat_id, media_kind = %file.media_kind))]
    async fn insert_file(&self, file: &FileRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO files (id, chat_id, file_id, file_name, media_kind, mime_type, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&file.id)
        .bind(file.chat_id)
        .bind(&file.file_id)
        .bind(&file.file_name)
        .bind(&file.media_kind)
        .bind(&file.mime_type)
        .bind(&file.description)
        .bind(file.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(id = %file.id, file_name = %file.file_name, "Saved file record");
        Ok(())
    }

    #[instrument(skip(self, search), fields(chat_id = search.chat_id))]
    async fn insert_search(&self, search: &SearchRecord) -> Result<(), StorageError> {
        let links = serde_json::to_string(&search.links)?;

        sqlx::query(
            r#"
            INSERT INTO searches (id, chat_id, query, summary, links, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&search.id)
        .bind(search.chat_id)
        .bind(&search.query)
        .bind(&search.summary)
        .bind(links)
        .bind(search.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(id = %search.id, links = search.links.len(), "Saved search record");
        Ok(())
    }

    async fn counts(&self) -> Result<RecordCounts, StorageError> {
        Ok(RecordCounts {
            total_users: self.count("users").await?,
            total_messages: self.count("messages").await?,
            total_files: self.count("files").await?,
            total_searches: self.count("searches").await?,
        })
    }
}
