//local shortcuts
use crate::utils::*;
use chat_relay::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn connections_limit_test()
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(&runtime, &store, ServerConfig{ max_connections: 1, ..Default::default() });

    // first client fits
    let alice = connect(&runtime, &server, ClientConfig::default());
    login_ok(&alice, "alice", "pw1", "Alice");
    assert_eq!(server.num_connections(), 1u64);

    // second client is dropped right after the connection is accepted
    let rejected = ClientFactory::default().new_client(runtime.clone(), server.address());
    wait();

    let Some(ClientEvent::Report(ClientReport::Connected)) = rejected.next()
    else { panic!("the TCP connection should be accepted"); };
    expect_disconnected(&rejected);
    assert_eq!(server.num_connections(), 1u64);

    // after the first client leaves there is room again
    alice.close();
    wait();
    assert_eq!(server.num_connections(), 0u64);

    let bob = connect(&runtime, &server, ClientConfig::default());
    login_ok(&bob, "bob", "pw2", "Bob");
    assert_eq!(server.num_connections(), 1u64);
}

//-------------------------------------------------------------------------------------------------------------------
