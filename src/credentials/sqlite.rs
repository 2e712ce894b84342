//local shortcuts
use crate::*;

//third-party shortcuts
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;

//standard shortcuts
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn now_ms() -> i64
{
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn is_unique_violation(err: &sqlx::Error) -> bool
{
    match err
    {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

/// A [`CredentialStore`] backed by SQLite.
///
/// Passwords are stored and compared as given; hash them before they reach the relay if that matters.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore
{
    pool: sqlx::SqlitePool,
}

impl SqliteCredentialStore
{
    /// Open (or create) the database at `url` and make sure the tables exist.
    ///
    /// In-memory databases (`sqlite::memory:`) are limited to one pooled connection that is never recycled, so all
    /// queries see the same database.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error>
    {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool_options = match url.contains(":memory:")
        {
            // the database lives and dies with its only connection
            true => SqlitePoolOptions::new().max_connections(1).idle_timeout(None).max_lifetime(None),
            false => SqlitePoolOptions::new().max_connections(4),
        };
        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and make sure the tables exist.
    pub async fn from_pool(pool: sqlx::SqlitePool) -> Result<Self, sqlx::Error>
    {
        Self::init(&pool).await?;
        Ok(Self{ pool })
    }

    /// Create the `users` and `chat_logs` tables if they don't exist.
    async fn init(pool: &sqlx::SqlitePool) -> Result<(), sqlx::Error>
    {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                nickname TEXT NOT NULL,
                avatar   INTEGER NOT NULL DEFAULT 1
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS chat_logs (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_name   TEXT NOT NULL,
                content       TEXT NOT NULL,
                receiver_name TEXT NOT NULL,
                created_at    INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Look up an account.
    pub async fn user(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error>
    {
        let row = sqlx::query("SELECT id, username, password, nickname, avatar FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None); };

        Ok(Some(UserRecord{
            id       : row.try_get("id")?,
            username : row.try_get("username")?,
            password : row.try_get("password")?,
            nickname : row.try_get("nickname")?,
            avatar   : row.try_get("avatar")?,
        }))
    }

    /// Chat history, oldest first.
    pub async fn chat_log(&self) -> Result<Vec<ChatLogEntry>, sqlx::Error>
    {
        let rows = sqlx::query("SELECT sender_name, content, receiver_name FROM chat_logs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<ChatLogEntry, sqlx::Error>
                {
                    Ok(ChatLogEntry{
                        sender   : row.try_get("sender_name")?,
                        content  : row.try_get("content")?,
                        receiver : row.try_get("receiver_name")?,
                    })
                }
            )
            .collect()
    }
}

#[async_trait::async_trait]
impl CredentialStore for SqliteCredentialStore
{
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>
    {
        let row = sqlx::query("SELECT nickname FROM users WHERE username = ? AND password = ?")
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| AuthError::Unavailable(err.to_string()))?;
        let Some(row) = row else { return Err(AuthError::InvalidCredentials); };

        row.try_get("nickname").map_err(|err| AuthError::Unavailable(err.to_string()))
    }

    async fn register(&self, username: &str, password: &str, nickname: &str) -> Result<(), RegisterError>
    {
        let existing = sqlx::query("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RegisterError::Unavailable(err.to_string()))?;
        if existing.is_some() { return Err(RegisterError::UsernameTaken); }

        // a concurrent registration can still win the race between the check and the insert
        let result = sqlx::query("INSERT INTO users (username, password, nickname, avatar) VALUES (?, ?, ?, ?)")
            .bind(username)
            .bind(password)
            .bind(nickname)
            .bind(DEFAULT_AVATAR)
            .execute(&self.pool)
            .await;

        match result
        {
            Ok(_) =>
            {
                tracing::debug!(username, "registered user");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(RegisterError::UsernameTaken),
            Err(err) => Err(RegisterError::Unavailable(err.to_string())),
        }
    }

    async fn log_chat(&self, entry: ChatLogEntry) -> Result<(), StoreError>
    {
        sqlx::query("INSERT INTO chat_logs (sender_name, content, receiver_name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&entry.sender)
            .bind(&entry.content)
            .bind(&entry.receiver)
            .bind(now_ms())
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(())
    }
}

//-------------------------------------------------------------------------------------------------------------------
