//local shortcuts
use chat_relay::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn insert_respects_policy()
{
    let registry = SessionRegistry::new();
    assert!(registry.is_empty());

    let (first, _first_rx) = SessionHandle::new(1, 4);
    let (second, _second_rx) = SessionHandle::new(2, 4);
    let (third, _third_rx) = SessionHandle::new(3, 4);

    assert!(registry.insert("Alice", first, DuplicateLoginPolicy::Reject).unwrap().is_none());
    assert_eq!(
            registry.insert("Alice", second, DuplicateLoginPolicy::Reject).unwrap_err(),
            RegistryError::NicknameTaken(String::from("Alice"))
        );
    assert_eq!(registry.get("Alice").map(|handle| handle.id()), Some(1));

    let displaced = registry.insert("Alice", third, DuplicateLoginPolicy::ReplaceExisting).unwrap();
    assert_eq!(displaced.map(|handle| handle.id()), Some(1));
    assert_eq!(registry.get("Alice").map(|handle| handle.id()), Some(3));
    assert_eq!(registry.len(), 1);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn stale_entries_are_replaced()
{
    let registry = SessionRegistry::new();

    let (stale, stale_rx) = SessionHandle::new(1, 4);
    registry.insert("Alice", stale, DuplicateLoginPolicy::Reject).unwrap();
    drop(stale_rx);

    let (fresh, _fresh_rx) = SessionHandle::new(2, 4);
    assert!(registry.insert("Alice", fresh, DuplicateLoginPolicy::Reject).unwrap().is_none());
    assert_eq!(registry.get("Alice").map(|handle| handle.id()), Some(2));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn remove_is_keyed_by_session()
{
    let registry = SessionRegistry::new();

    let (old, _old_rx) = SessionHandle::new(1, 4);
    let (new, _new_rx) = SessionHandle::new(2, 4);
    registry.insert("Alice", old, DuplicateLoginPolicy::Reject).unwrap();
    registry.insert("Alice", new, DuplicateLoginPolicy::ReplaceExisting).unwrap();

    // the displaced session's teardown must not unregister its replacement
    assert!(!registry.remove("Alice", 1));
    assert!(registry.contains("Alice"));

    assert!(registry.remove("Alice", 2));
    assert!(!registry.contains("Alice"));
    assert!(!registry.remove("Alice", 2));
    assert!(registry.is_empty());
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn snapshot_is_point_in_time()
{
    let registry = SessionRegistry::new();

    let (bob, _bob_rx) = SessionHandle::new(1, 4);
    let (alice, _alice_rx) = SessionHandle::new(2, 4);
    registry.insert("Bob", bob, DuplicateLoginPolicy::Reject).unwrap();
    registry.insert("Alice", alice, DuplicateLoginPolicy::Reject).unwrap();

    let snapshot = registry.snapshot();
    assert_eq!(registry.nicknames(), vec![String::from("Alice"), String::from("Bob")]);

    let (carol, _carol_rx) = SessionHandle::new(3, 4);
    registry.insert("Carol", carol, DuplicateLoginPolicy::Reject).unwrap();
    assert!(registry.remove("Bob", 1));

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().any(|(nickname, _)| nickname == "Bob"));
    assert_eq!(registry.nicknames(), vec![String::from("Alice"), String::from("Carol")]);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn concurrent_registration()
{
    let registry = SessionRegistry::new();
    let num_threads = 8u64;

    // every thread races for the same nickname and registers one of its own
    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let (shared, shared_rx) = SessionHandle::new(i * 2, 4);
                let (own, own_rx) = SessionHandle::new(i * 2 + 1, 4);
                let won = registry.insert("Shared", shared, DuplicateLoginPolicy::Reject).is_ok();
                registry.insert(&format!("User{}", i), own, DuplicateLoginPolicy::Reject).unwrap();
                (won, shared_rx, own_rx)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|(won, _, _)| *won).count(), 1);
    assert_eq!(registry.len(), num_threads as usize + 1);
}

//-------------------------------------------------------------------------------------------------------------------
