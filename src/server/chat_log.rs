//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Make a chat history queue that feeds `store`.
///
/// Entries are appended one at a time in the order they were queued. The [`ChatLogWriter`] must be spawned; it
/// runs until every [`ChatLogSender`] is dropped.
pub fn chat_log_channel(store: Arc<dyn CredentialStore>, capacity: usize) -> (ChatLogSender, ChatLogWriter)
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ChatLogSender{ sender }, ChatLogWriter{ store, receiver })
}

//-------------------------------------------------------------------------------------------------------------------

/// Queues chat history entries without waiting on the store.
#[derive(Debug, Clone)]
pub struct ChatLogSender
{
    sender: mpsc::Sender<ChatLogEntry>,
}

impl ChatLogSender
{
    /// Queue an entry.
    /// - Returns `false` if the entry was dropped because the queue is full or the writer stopped.
    pub fn try_log(&self, entry: ChatLogEntry) -> bool
    {
        match self.sender.try_send(entry)
        {
            Ok(()) => true,
            Err(TrySendError::Full(entry)) =>
            {
                tracing::warn!(sender = %entry.sender, "chat log queue is full, dropping entry");
                false
            }
            Err(TrySendError::Closed(_)) =>
            {
                tracing::warn!("chat log writer stopped, dropping entry");
                false
            }
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Appends queued entries to the store, one at a time.
#[derive(Debug)]
pub struct ChatLogWriter
{
    store: Arc<dyn CredentialStore>,
    receiver: mpsc::Receiver<ChatLogEntry>,
}

impl ChatLogWriter
{
    pub async fn run(mut self)
    {
        while let Some(entry) = self.receiver.recv().await
        {
            if let Err(err) = self.store.log_chat(entry).await
            {
                tracing::warn!(?err, "failed to log chat message");
            }
        }
        tracing::debug!("chat log writer stopped");
    }
}

//-------------------------------------------------------------------------------------------------------------------
