//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

//-------------------------------------------------------------------------------------------------------------------

#[derive(Debug)]
struct MemoryTables
{
    /// users keyed by username
    users: HashMap<String, UserRecord>,
    chat_log: Vec<ChatLogEntry>,
    next_user_id: i64,
    available: bool,
}

impl Default for MemoryTables
{
    fn default() -> Self
    {
        Self{ users: HashMap::default(), chat_log: Vec::default(), next_user_id: 1, available: true }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// A [`CredentialStore`] that keeps everything in memory.
///
/// Clones share the same tables, so a clone can be kept to inspect the store after handing it to a server.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore
{
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryCredentialStore
{
    /// Make an empty store.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Toggle availability. While unavailable every operation fails as if the backing database were down.
    pub fn set_available(&self, available: bool)
    {
        let Ok(mut tables) = self.tables.lock() else { tracing::error!("memory store lock poisoned"); return; };
        tables.available = available;
    }

    /// Number of registered accounts.
    pub fn num_users(&self) -> usize
    {
        let Ok(tables) = self.tables.lock() else { return 0; };
        tables.users.len()
    }

    /// Look up an account.
    pub fn user(&self, username: &str) -> Option<UserRecord>
    {
        let Ok(tables) = self.tables.lock() else { return None; };
        tables.users.get(username).cloned()
    }

    /// Copy of the chat history, oldest first.
    pub fn chat_log(&self) -> Vec<ChatLogEntry>
    {
        let Ok(tables) = self.tables.lock() else { return Vec::default(); };
        tables.chat_log.clone()
    }

    /// Create an account without going through the async [`CredentialStore`] interface.
    ///
    /// Useful for seeding a store before a server starts.
    pub fn add_user(&self, username: &str, password: &str, nickname: &str) -> Result<(), RegisterError>
    {
        let mut tables = self.lock_available().map_err(RegisterError::Unavailable)?;
        if tables.users.contains_key(username) { return Err(RegisterError::UsernameTaken); }

        let id = tables.next_user_id;
        tables.next_user_id += 1;
        tables.users.insert(
                String::from(username),
                UserRecord{
                    id,
                    username : String::from(username),
                    password : String::from(password),
                    nickname : String::from(nickname),
                    avatar   : DEFAULT_AVATAR,
                }
            );
        tracing::debug!(id, username, "registered user");

        Ok(())
    }

    fn lock_available(&self) -> Result<MutexGuard<'_, MemoryTables>, String>
    {
        let tables = self.tables.lock().map_err(|_| String::from("memory store lock poisoned"))?;
        if !tables.available { return Err(String::from("memory store offline")); }
        Ok(tables)
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore
{
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>
    {
        let tables = self.lock_available().map_err(AuthError::Unavailable)?;
        match tables.users.get(username)
        {
            Some(user) if user.password == password => Ok(user.nickname.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn register(&self, username: &str, password: &str, nickname: &str) -> Result<(), RegisterError>
    {
        self.add_user(username, password, nickname)
    }

    async fn log_chat(&self, entry: ChatLogEntry) -> Result<(), StoreError>
    {
        let mut tables = self.lock_available().map_err(StoreError::Unavailable)?;
        tables.chat_log.push(entry);
        Ok(())
    }
}

//-------------------------------------------------------------------------------------------------------------------
