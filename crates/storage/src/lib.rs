use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::sync::RwLock;

use shared::domain::{ProfileRecord, StoredUser, UserId, UserRecord};

/// Key-value document reads and writes. The profile record and the small
/// view-state documents (current screen, active tab) go through this.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load_document(&self, key: &str) -> Result<Option<Value>>;
    async fn save_document(&self, key: &str, value: &Value) -> Result<()>;
}

/// The dashboard's user collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Users ordered ascending by name, case-insensitively.
    async fn list_users(&self) -> Result<Vec<StoredUser>>;
    async fn add_user(&self, user: &UserRecord) -> Result<UserId>;
    /// Returns false when no such user existed.
    async fn remove_user(&self, user_id: UserId) -> Result<bool>;
    async fn get_user(&self, user_id: UserId) -> Result<Option<StoredUser>>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for Storage {
    async fn load_document(&self, key: &str) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT value FROM documents WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            serde_json::from_str(&r.get::<String, _>(0))
                .with_context(|| format!("corrupt document for key '{key}'"))
        })
        .transpose()
    }

    async fn save_document(&self, key: &str, value: &Value) -> Result<()> {
        sqlx::query(
            "INSERT INTO documents (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for Storage {
    async fn list_users(&self) -> Result<Vec<StoredUser>> {
        let rows = sqlx::query(
            "SELECT id, name, email, contact, created_at
             FROM users
             ORDER BY lower(name) ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| StoredUser {
                user_id: UserId(r.get::<i64, _>(0)),
                name: r.get::<String, _>(1),
                email: r.get::<String, _>(2),
                contact: r.get::<String, _>(3),
                created_at: r.get::<DateTime<Utc>, _>(4),
            })
            .collect())
    }

    async fn add_user(&self, user: &UserRecord) -> Result<UserId> {
        let rec = sqlx::query(
            "INSERT INTO users (name, email, contact, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.contact)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(UserId(rec.get::<i64, _>(0)))
    }

    async fn remove_user(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<StoredUser>> {
        let row = sqlx::query("SELECT id, name, email, contact, created_at FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| StoredUser {
            user_id: UserId(r.get::<i64, _>(0)),
            name: r.get::<String, _>(1),
            email: r.get::<String, _>(2),
            contact: r.get::<String, _>(3),
            created_at: r.get::<DateTime<Utc>, _>(4),
        }))
    }
}

/// Typed profile read over a document store. Missing key means "use the
/// default record"; a corrupt document is a read error for the caller to
/// recover from.
pub async fn load_profile(store: &dyn DocumentStore, key: &str) -> Result<Option<ProfileRecord>> {
    let Some(value) = store.load_document(key).await? else {
        return Ok(None);
    };
    let record = serde_json::from_value(value)
        .with_context(|| format!("document '{key}' is not a profile record"))?;
    Ok(Some(record))
}

pub async fn save_profile(
    store: &dyn DocumentStore,
    key: &str,
    record: &ProfileRecord,
) -> Result<()> {
    let value = serde_json::to_value(record).context("failed to serialize profile record")?;
    store.save_document(key, &value).await
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, Value>,
    users: Vec<StoredUser>,
    next_user_id: i64,
}

/// In-memory fallback store, used when the SQLite database cannot be
/// opened. Contents do not survive the process.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load_document(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.state.read().await.documents.get(key).cloned())
    }

    async fn save_document(&self, key: &str, value: &Value) -> Result<()> {
        self.state
            .write()
            .await
            .documents
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<StoredUser>> {
        let mut users = self.state.read().await.users.clone();
        users.sort_by_key(|u| u.name.to_lowercase());
        Ok(users)
    }

    async fn add_user(&self, user: &UserRecord) -> Result<UserId> {
        let mut state = self.state.write().await;
        state.next_user_id += 1;
        let user_id = UserId(state.next_user_id);
        state.users.push(StoredUser {
            user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            contact: user.contact.clone(),
            created_at: user.created_at,
        });
        Ok(user_id)
    }

    async fn remove_user(&self, user_id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.user_id != user_id);
        Ok(state.users.len() < before)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<StoredUser>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }
}

/// A store that always fails. Exercises the read-fallback and
/// write-notification paths in tests.
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn load_document(&self, key: &str) -> Result<Option<Value>> {
        Err(anyhow!("storage unavailable while reading '{key}'"))
    }

    async fn save_document(&self, key: &str, _value: &Value) -> Result<()> {
        Err(anyhow!("storage unavailable while writing '{key}'"))
    }
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn list_users(&self) -> Result<Vec<StoredUser>> {
        Err(anyhow!("storage unavailable while listing users"))
    }

    async fn add_user(&self, _user: &UserRecord) -> Result<UserId> {
        Err(anyhow!("storage unavailable while adding a user"))
    }

    async fn remove_user(&self, _user_id: UserId) -> Result<bool> {
        Err(anyhow!("storage unavailable while removing a user"))
    }

    async fn get_user(&self, _user_id: UserId) -> Result<Option<StoredUser>> {
        Err(anyhow!("storage unavailable while loading a user"))
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
