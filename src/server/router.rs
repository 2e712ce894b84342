//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Prefix of the [`EnvelopeKind::LoginOk`] greeting. The nickname follows.
pub const LOGIN_GREETING: &str = "Welcome back, ";
/// [`EnvelopeKind::LoginFail`] reason for unknown usernames and wrong passwords.
pub const REASON_BAD_CREDENTIALS: &str = "incorrect username or password";
/// [`EnvelopeKind::LoginFail`] reason for a second login on the same connection.
pub const REASON_ALREADY_LOGGED_IN: &str = "already logged in";
/// [`EnvelopeKind::LoginFail`] reason when the nickname is online elsewhere and duplicates are rejected.
pub const REASON_ALREADY_ONLINE: &str = "user is already online";
/// [`EnvelopeKind::RegisterFail`] reason for a taken username.
pub const REASON_USERNAME_TAKEN: &str = "username already exists";
/// Failure reason when credential content does not unpack.
pub const REASON_MALFORMED_CREDENTIALS: &str = "malformed credentials";
/// Failure reason when the credential store is down.
pub const REASON_STORE_UNAVAILABLE: &str = "server error, please try again later";
/// [`EnvelopeKind::Rejected`] reason for chat from an unauthenticated session.
pub const REASON_CHAT_BEFORE_LOGIN: &str = "log in before chatting";
/// [`EnvelopeKind::RegisterOk`] notice.
pub const NOTICE_REGISTERED: &str = "registration succeeded, please log in with the new account";

//-------------------------------------------------------------------------------------------------------------------

/// How an inbound envelope is handled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Route
{
    /// Check credentials and register the session.
    Authenticate,
    /// Create an account.
    Register,
    /// Fan a chat message out to every other online session.
    Broadcast,
    /// Answer a login on an already authenticated session with [`EnvelopeKind::LoginFail`].
    RejectLogin,
    /// Answer chat from an unauthenticated session with [`EnvelopeKind::Rejected`].
    RejectChat,
    /// The client sent a kind only the relay may send. The session is closed.
    ProtocolViolation,
}

/// Decide how to handle an envelope of `kind` arriving on a session in `state`.
pub fn classify(state: &SessionState, kind: EnvelopeKind) -> Route
{
    if kind.is_server_only() { return Route::ProtocolViolation; }

    match (state, kind)
    {
        (SessionState::Connected, EnvelopeKind::Login)           => Route::Authenticate,
        (SessionState::Authenticated{ .. }, EnvelopeKind::Login) => Route::RejectLogin,
        (_, EnvelopeKind::Register)                              => Route::Register,
        (SessionState::Authenticated{ .. }, EnvelopeKind::Chat)  => Route::Broadcast,
        (SessionState::Connected, EnvelopeKind::Chat)            => Route::RejectChat,
        _                                                        => Route::ProtocolViolation,
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// What the session should do after an envelope was routed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Dispatch
{
    Continue,
    Close(String),
}

//-------------------------------------------------------------------------------------------------------------------

/// Outcome of one broadcast.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BroadcastSummary
{
    /// Peers the envelope was enqueued for.
    pub delivered: usize,
    /// Peers that could not take the envelope (closed, or full and now being disconnected).
    pub failed: usize,
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn reply(session: &SessionHandle, envelope: Envelope) -> Dispatch
{
    match session.deliver(envelope)
    {
        Ok(())                             => Dispatch::Continue,
        Err(DeliveryError::QueueFull)      => Dispatch::Close(String::from("outbound queue overflow")),
        Err(DeliveryError::SessionClosed)  => Dispatch::Close(String::from("writer stopped")),
    }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

/// Routes inbound envelopes to the registry, the credential store, or other sessions.
///
/// Cheap to clone; every session task holds one.
#[derive(Debug, Clone)]
pub struct Router
{
    registry: SessionRegistry,
    store: Arc<dyn CredentialStore>,
    chat_log: ChatLogSender,
    duplicate_login: DuplicateLoginPolicy,
}

impl Router
{
    /// Make a new router.
    ///
    /// Chat history goes through `chat_log` rather than straight to `store`, so appends keep broadcast order.
    pub fn new(
        registry        : SessionRegistry,
        store           : Arc<dyn CredentialStore>,
        chat_log        : ChatLogSender,
        duplicate_login : DuplicateLoginPolicy,
    ) -> Self
    {
        Self{ registry, store, chat_log, duplicate_login }
    }

    /// The registry this router reads and writes.
    pub fn registry(&self) -> &SessionRegistry
    {
        &self.registry
    }

    /// Handle one envelope received by `session`.
    ///
    /// Replies are enqueued on the session's own outbound queue. Store failures become failure replies; they never
    /// close the session.
    pub async fn dispatch(&self, state: &mut SessionState, session: &SessionHandle, envelope: Envelope) -> Dispatch
    {
        let route = classify(state, envelope.kind);
        tracing::trace!(session_id = session.id(), ?route, "routing envelope");

        match route
        {
            Route::Authenticate => self.handle_login(state, session, &envelope.content).await,
            Route::Register     => self.handle_register(session, &envelope.content).await,
            Route::Broadcast =>
            {
                let Some(nickname) = state.nickname() else { return Dispatch::Continue; };
                self.handle_chat(nickname, envelope);
                Dispatch::Continue
            }
            Route::RejectLogin =>
            {
                tracing::debug!(session_id = session.id(), "rejecting login on authenticated session");
                reply(session, Envelope::reply(EnvelopeKind::LoginFail, REASON_ALREADY_LOGGED_IN))
            }
            Route::RejectChat =>
            {
                tracing::debug!(session_id = session.id(), "rejecting chat from unauthenticated session");
                reply(session, Envelope::reply(EnvelopeKind::Rejected, REASON_CHAT_BEFORE_LOGIN))
            }
            Route::ProtocolViolation =>
            {
                tracing::debug!(session_id = session.id(), kind = ?envelope.kind, "client sent a relay-only envelope");
                Dispatch::Close(format!("client sent {:?}", envelope.kind))
            }
        }
    }

    async fn handle_login(&self, state: &mut SessionState, session: &SessionHandle, content: &str) -> Dispatch
    {
        let Some(credentials) = parse_login_content(content)
        else { return reply(session, Envelope::reply(EnvelopeKind::LoginFail, REASON_MALFORMED_CREDENTIALS)); };

        // check credentials
        let nickname = match self.store.authenticate(&credentials.username, &credentials.password).await
        {
            Ok(nickname) => nickname,
            Err(AuthError::InvalidCredentials) =>
            {
                tracing::debug!(session_id = session.id(), username = credentials.username, "login failed");
                return reply(session, Envelope::reply(EnvelopeKind::LoginFail, REASON_BAD_CREDENTIALS));
            }
            Err(AuthError::Unavailable(reason)) =>
            {
                tracing::warn!(session_id = session.id(), reason, "credential store unavailable during login");
                return reply(session, Envelope::reply(EnvelopeKind::LoginFail, REASON_STORE_UNAVAILABLE));
            }
        };

        // register the session
        match self.registry.insert(&nickname, session.clone(), self.duplicate_login)
        {
            Ok(None) => (),
            Ok(Some(displaced)) =>
            {
                tracing::info!(nickname, displaced_id = displaced.id(), "closing session displaced by a new login");
                displaced.close("replaced by a new login");
            }
            Err(RegistryError::NicknameTaken(_)) =>
            {
                tracing::debug!(session_id = session.id(), nickname, "login refused, nickname is online");
                return reply(session, Envelope::reply(EnvelopeKind::LoginFail, REASON_ALREADY_ONLINE));
            }
        }

        tracing::info!(session_id = session.id(), nickname, "user online");
        let greeting = Envelope::reply(EnvelopeKind::LoginOk, format!("{}{}", LOGIN_GREETING, nickname))
            .with_receiver(nickname.clone());
        *state = SessionState::Authenticated{ nickname };

        reply(session, greeting)
    }

    async fn handle_register(&self, session: &SessionHandle, content: &str) -> Dispatch
    {
        let Some(credentials) = parse_register_content(content)
        else { return reply(session, Envelope::reply(EnvelopeKind::RegisterFail, REASON_MALFORMED_CREDENTIALS)); };

        let result = self.store.register(&credentials.username, &credentials.password, &credentials.nickname).await;
        let response = match result
        {
            Ok(()) =>
            {
                tracing::info!(session_id = session.id(), username = credentials.username, "user registered");
                Envelope::reply(EnvelopeKind::RegisterOk, NOTICE_REGISTERED)
            }
            Err(RegisterError::UsernameTaken) =>
            {
                tracing::debug!(session_id = session.id(), username = credentials.username, "username taken");
                Envelope::reply(EnvelopeKind::RegisterFail, REASON_USERNAME_TAKEN)
            }
            Err(RegisterError::Unavailable(reason)) =>
            {
                tracing::warn!(session_id = session.id(), reason, "credential store unavailable during registration");
                Envelope::reply(EnvelopeKind::RegisterFail, REASON_STORE_UNAVAILABLE)
            }
        };

        reply(session, response)
    }

    fn handle_chat(&self, nickname: &str, mut envelope: Envelope)
    {
        // the relay vouches for the sender
        if envelope.sender != nickname
        {
            tracing::debug!(nickname, claimed = envelope.sender, "overwriting chat sender");
            envelope.sender = String::from(nickname);
        }

        let summary = self.broadcast(&envelope);
        tracing::trace!(nickname, delivered = summary.delivered, failed = summary.failed, "broadcast chat message");

        // best-effort history
        self.chat_log.try_log(ChatLogEntry::from_envelope(&envelope));
    }

    /// Enqueue `envelope` for every registered session except the one registered under `envelope.sender`.
    ///
    /// Iterates a snapshot of the registry, so sessions that register during the broadcast don't receive it.
    /// Peers are independent: a peer whose queue is full is told to close, a closed peer is skipped, and the rest
    /// still receive the envelope.
    pub fn broadcast(&self, envelope: &Envelope) -> BroadcastSummary
    {
        let mut summary = BroadcastSummary::default();

        for (nickname, peer) in self.registry.snapshot()
        {
            if nickname == envelope.sender { continue; }

            match peer.deliver(envelope.clone())
            {
                Ok(()) => summary.delivered += 1,
                Err(DeliveryError::QueueFull) =>
                {
                    tracing::warn!(peer_id = peer.id(), nickname, "peer outbound queue is full, disconnecting slow peer");
                    peer.close("outbound queue overflow");
                    summary.failed += 1;
                }
                Err(DeliveryError::SessionClosed) =>
                {
                    tracing::debug!(peer_id = peer.id(), nickname, "skipping closed peer");
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

//-------------------------------------------------------------------------------------------------------------------
