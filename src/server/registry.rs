//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

//-------------------------------------------------------------------------------------------------------------------

/// Directory of online users: nickname -> live authenticated session.
///
/// Clones share the same directory. Every access goes through one mutex, so inserts, removals, and snapshots are
/// linearizable. The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry
{
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry
{
    /// Make an empty registry.
    pub fn new() -> Self
    {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>>
    {
        // entries are only inserted/removed whole, so a poisoned map is still consistent
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a session under a nickname.
    ///
    /// If the nickname is owned by a session whose writer already stopped, that stale entry is replaced.
    /// Otherwise the policy decides: [`DuplicateLoginPolicy::Reject`] fails with [`RegistryError::NicknameTaken`],
    /// [`DuplicateLoginPolicy::ReplaceExisting`] overwrites the entry and returns the displaced handle so the
    /// caller can close it.
    pub fn insert(
        &self,
        nickname : &str,
        handle   : SessionHandle,
        policy   : DuplicateLoginPolicy
    ) -> Result<Option<SessionHandle>, RegistryError>
    {
        let mut sessions = self.lock();
        match sessions.entry(String::from(nickname))
        {
            Entry::Vacant(entry) =>
            {
                entry.insert(handle);
                Ok(None)
            }
            Entry::Occupied(mut entry) =>
            {
                if entry.get().is_closed()
                {
                    tracing::debug!(nickname, stale_id = entry.get().id(), "replacing stale registry entry");
                    entry.insert(handle);
                    return Ok(None);
                }

                match policy
                {
                    DuplicateLoginPolicy::Reject => Err(RegistryError::NicknameTaken(String::from(nickname))),
                    DuplicateLoginPolicy::ReplaceExisting => Ok(Some(entry.insert(handle))),
                }
            }
        }
    }

    /// Unregister a nickname, but only if it is still owned by session `id`.
    /// - Returns `true` if an entry was removed.
    pub fn remove(&self, nickname: &str, id: SessionId) -> bool
    {
        let mut sessions = self.lock();
        let Some(handle) = sessions.get(nickname) else { return false; };
        if handle.id() != id { return false; }
        sessions.remove(nickname);
        true
    }

    /// Point-in-time copy of the directory.
    pub fn snapshot(&self) -> Vec<(String, SessionHandle)>
    {
        self.lock()
            .iter()
            .map(|(nickname, handle)| (nickname.clone(), handle.clone()))
            .collect()
    }

    /// Get the session registered under a nickname.
    pub fn get(&self, nickname: &str) -> Option<SessionHandle>
    {
        self.lock().get(nickname).cloned()
    }

    /// Test if a nickname is registered.
    pub fn contains(&self, nickname: &str) -> bool
    {
        self.lock().contains_key(nickname)
    }

    /// Registered nicknames, sorted.
    pub fn nicknames(&self) -> Vec<String>
    {
        let mut nicknames: Vec<String> = self.lock().keys().cloned().collect();
        nicknames.sort_unstable();
        nicknames
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize
    {
        self.lock().len()
    }

    /// Test if no session is registered.
    pub fn is_empty(&self) -> bool
    {
        self.lock().is_empty()
    }
}

//-------------------------------------------------------------------------------------------------------------------
