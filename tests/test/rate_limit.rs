//local shortcuts
use crate::utils::*;
use chat_relay::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn rate_limit_test(max_count_per_period: u32)
{
    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = seeded_store();
    let server = launch_server(
            &runtime,
            &store,
            ServerConfig{
                rate_limit_config: RateLimitConfig{
                        period    : std::time::Duration::from_secs(1),
                        max_count : max_count_per_period
                    },
                ..Default::default()
            }
        );
    let client = connect(&runtime, &server, ClientConfig::default());

    // fill the window
    for _ in 0..max_count_per_period
    {
        client.login("alice", "wrong").unwrap();
    }
    wait();

    for _ in 0..max_count_per_period
    {
        assert_eq!(next_msg(&client).kind, EnvelopeKind::LoginFail);
    }
    assert!(client.next().is_none());
    assert!(!client.is_dead());

    // one more is too many
    client.login("alice", "wrong").unwrap();
    wait();

    expect_disconnected(&client);
    assert_eq!(server.num_connections(), 0u64);
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn rate_limiting_1()
{
    rate_limit_test(1);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn rate_limiting_5()
{
    rate_limit_test(5);
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn rate_tracker_window()
{
    let mut tracker = RateLimitTracker::new(RateLimitConfig{
            period    : std::time::Duration::from_millis(20),
            max_count : 2,
        });

    assert!(tracker.try_count_msg());
    assert!(tracker.try_count_msg());
    assert!(!tracker.try_count_msg());

    std::thread::sleep(std::time::Duration::from_millis(30));
    assert!(tracker.try_count_msg());
}

//-------------------------------------------------------------------------------------------------------------------
