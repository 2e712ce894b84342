//local shortcuts
use crate::utils::*;
use chat_relay::*;

//third-party shortcuts
use enfync::Handle;

//standard shortcuts
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn sqlite_accounts()
{
    let store = SqliteCredentialStore::connect("sqlite::memory:").await.unwrap();

    store.register("eve", "secret", "Eve").await.unwrap();
    assert_eq!(store.register("eve", "other", "Eve2").await, Err(RegisterError::UsernameTaken));

    let record = store.user("eve").await.unwrap().unwrap();
    assert_eq!(record.username, "eve");
    assert_eq!(record.nickname, "Eve");
    assert_eq!(record.avatar, DEFAULT_AVATAR);
    assert!(store.user("nobody").await.unwrap().is_none());

    assert_eq!(store.authenticate("eve", "secret").await, Ok(String::from("Eve")));
    assert_eq!(store.authenticate("eve", "wrong").await, Err(AuthError::InvalidCredentials));
    assert_eq!(store.authenticate("nobody", "secret").await, Err(AuthError::InvalidCredentials));
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn sqlite_chat_log()
{
    let store = SqliteCredentialStore::connect("sqlite::memory:").await.unwrap();
    assert!(store.chat_log().await.unwrap().is_empty());

    let first = ChatLogEntry::from_envelope(&Envelope::chat("Alice", "hello"));
    let second = ChatLogEntry::from_envelope(&Envelope::chat("Bob", "hi").with_receiver("Alice"));
    store.log_chat(first.clone()).await.unwrap();
    store.log_chat(second.clone()).await.unwrap();

    assert_eq!(store.chat_log().await.unwrap(), vec![first, second]);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn relay_over_sqlite()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = enfync::blocking::extract(runtime.spawn(async {
            SqliteCredentialStore::connect("sqlite::memory:").await
        }))
        .unwrap()
        .unwrap();

    let server = ServerFactory::new(Arc::new(store.clone()))
        .new_server(runtime.clone(), "127.0.0.1:0", ServerConfig::default())
        .unwrap();

    let eve = connect(&runtime, &server, ClientConfig::default());
    eve.register("eve", "secret", "Eve").unwrap();
    wait();
    assert_eq!(next_msg(&eve).kind, EnvelopeKind::RegisterOk);
    login_ok(&eve, "eve", "secret", "Eve");

    let bob_store_entry = enfync::blocking::extract(runtime.spawn({
            let store = store.clone();
            async move { store.register("bob", "pw2", "Bob").await }
        }))
        .unwrap();
    assert_eq!(bob_store_entry, Ok(()));

    let bob = connect(&runtime, &server, ClientConfig::default());
    login_ok(&bob, "bob", "pw2", "Bob");

    eve.chat("hello from sqlite").unwrap();
    wait();
    assert_eq!(next_msg(&bob).sender, "Eve");

    let log = enfync::blocking::extract(runtime.spawn({
            let store = store.clone();
            async move { store.chat_log().await }
        }))
        .unwrap()
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].content, "hello from sqlite");
}

//-------------------------------------------------------------------------------------------------------------------
