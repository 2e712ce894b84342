//local shortcuts
use crate::utils::*;
use chat_relay::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn register_then_login()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = MemoryCredentialStore::new();
    let server = launch_server(&runtime, &store, ServerConfig::default());
    let eve = connect(&runtime, &server, ClientConfig::default());

    // register
    eve.register("eve", "secret", "Eve").unwrap();
    wait();

    let reply = next_msg(&eve);
    assert_eq!(reply.kind, EnvelopeKind::RegisterOk);
    assert_eq!(reply.content, NOTICE_REGISTERED);
    assert_eq!(store.num_users(), 1);

    let record = store.user("eve").unwrap();
    assert_eq!(record.nickname, "Eve");
    assert_eq!(record.avatar, DEFAULT_AVATAR);

    // registering does not log in
    assert!(eve.nickname().is_none());
    assert!(!server.is_online("Eve"));

    // the same username can't be registered twice
    eve.register("eve", "other", "Eve2").unwrap();
    wait();

    let reply = next_msg(&eve);
    assert_eq!(reply.kind, EnvelopeKind::RegisterFail);
    assert_eq!(reply.content, REASON_USERNAME_TAKEN);
    assert_eq!(store.num_users(), 1);

    // wrong password
    eve.login("eve", "wrong").unwrap();
    wait();

    let reply = next_msg(&eve);
    assert_eq!(reply.kind, EnvelopeKind::LoginFail);
    assert_eq!(reply.content, REASON_BAD_CREDENTIALS);
    assert!(!server.is_online("Eve"));

    // log in with the new account
    login_ok(&eve, "eve", "secret", "Eve");
    assert!(server.is_online("Eve"));

    // registering is still allowed after login
    eve.register("mallory", "pw", "Mallory").unwrap();
    wait();
    assert_eq!(next_msg(&eve).kind, EnvelopeKind::RegisterOk);
    assert_eq!(store.num_users(), 2);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn multi_byte_nickname_round_trip()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(&runtime, &store, ServerConfig::default());

    let xiaoming = connect(&runtime, &server, ClientConfig::default());
    xiaoming.register("xiaoming", "密码", "小明").unwrap();
    wait();
    assert_eq!(next_msg(&xiaoming).kind, EnvelopeKind::RegisterOk);
    assert_eq!(store.user("xiaoming").unwrap().nickname, "小明");

    login_ok(&xiaoming, "xiaoming", "密码", "小明");
    assert!(server.is_online("小明"));

    let bob = connect(&runtime, &server, ClientConfig::default());
    login_ok(&bob, "bob", "pw2", "Bob");

    xiaoming.chat("欢迎回来，小明 👋").unwrap();
    wait();

    let chat = next_msg(&bob);
    assert_eq!(chat.kind, EnvelopeKind::Chat);
    assert_eq!(chat.sender, "小明");
    assert_eq!(chat.content, "欢迎回来，小明 👋");

    assert_eq!(store.chat_log(), vec![ChatLogEntry{
            sender   : String::from("小明"),
            content  : String::from("欢迎回来，小明 👋"),
            receiver : String::from(BROADCAST_RECEIVER),
        }]);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn unknown_user_cannot_log_in()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(&runtime, &store, ServerConfig::default());
    let client = connect(&runtime, &server, ClientConfig::default());

    client.login("nobody", "pw1").unwrap();
    wait();

    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::LoginFail);
    assert_eq!(reply.content, REASON_BAD_CREDENTIALS);
    assert_eq!(server.num_online(), 0usize);
    assert_eq!(server.num_connections(), 1u64);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn malformed_credentials_are_refused()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(&runtime, &store, ServerConfig::default());
    let client = connect(&runtime, &server, ClientConfig::default());

    // missing password
    client.send(Envelope::new(EnvelopeKind::Login, "", "alice")).unwrap();
    // too many fields
    client.send(Envelope::new(EnvelopeKind::Register, "", "a|b|c|d")).unwrap();
    // empty nickname
    client.send(Envelope::new(EnvelopeKind::Register, "", "dave|pw|")).unwrap();
    wait();

    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::LoginFail);
    assert_eq!(reply.content, REASON_MALFORMED_CREDENTIALS);
    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::RegisterFail);
    assert_eq!(reply.content, REASON_MALFORMED_CREDENTIALS);
    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::RegisterFail);
    assert_eq!(store.num_users(), 3);

    // the session survives
    login_ok(&client, "alice", "pw1", "Alice");
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn store_outage_is_reported_and_recoverable()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(&runtime, &store, ServerConfig::default());
    let client = connect(&runtime, &server, ClientConfig::default());

    // take the store down
    store.set_available(false);

    client.login("alice", "pw1").unwrap();
    wait();
    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::LoginFail);
    assert_eq!(reply.content, REASON_STORE_UNAVAILABLE);

    client.register("frank", "pw", "Frank").unwrap();
    wait();
    let reply = next_msg(&client);
    assert_eq!(reply.kind, EnvelopeKind::RegisterFail);
    assert_eq!(reply.content, REASON_STORE_UNAVAILABLE);
    assert!(!client.is_dead());

    // bring it back and retry
    store.set_available(true);
    login_ok(&client, "alice", "pw1", "Alice");

    // chat still fans out while the history can't be written
    let bob = connect(&runtime, &server, ClientConfig::default());
    login_ok(&bob, "bob", "pw2", "Bob");

    store.set_available(false);
    client.chat("is anyone there").unwrap();
    wait();

    assert_eq!(next_msg(&bob).content, "is anyone there");
    assert!(store.chat_log().is_empty());
}

//-------------------------------------------------------------------------------------------------------------------
