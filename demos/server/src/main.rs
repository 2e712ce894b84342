//local shortcuts
use chat_relay::*;

//third-party shortcuts
use clap::Parser;
use enfync::Handle;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

//standard shortcuts
use std::sync::Arc;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "chat_relay-server", about = "Broadcast chat relay")]
struct Cli
{
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8888")]
    address: String,

    /// SQLite database url (e.g. `sqlite://chat.db`). Accounts are kept in memory if omitted.
    #[arg(long, env = "CHAT_RELAY_DATABASE")]
    database: Option<String>,

    /// Seed the store with an account, formatted `username|password|nickname`. May be repeated.
    ///
    /// Accounts that already exist in the database are left untouched.
    #[arg(long = "user")]
    users: Vec<String>,

    /// Max concurrent connections.
    #[arg(long, default_value_t = 10_000)]
    max_connections: u32,

    /// Max envelope size in bytes.
    #[arg(long, default_value_t = 64_000)]
    max_msg_size: u32,

    /// Envelopes queued per session before the peer is dropped as too slow.
    #[arg(long, default_value_t = 256)]
    outbound_queue_size: usize,

    /// Chat lines queued for the store before new ones are dropped from the history.
    #[arg(long, default_value_t = 1024)]
    chat_log_queue_size: usize,

    /// Milliseconds a closing session may keep flushing queued envelopes.
    #[arg(long, default_value_t = 250)]
    close_linger_ms: u64,

    /// Close the existing session when a user logs in a second time.
    #[arg(long, default_value_t = false)]
    replace_duplicate_logins: bool,

    /// Log filter, overridden by `RUST_LOG`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

//-------------------------------------------------------------------------------------------------------------------

fn init_logging(cli: &Cli)
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

//-------------------------------------------------------------------------------------------------------------------

/// Parse `--user` values.
fn parse_users(users: &[String]) -> Result<Vec<RegisterCredentials>, String>
{
    users.iter()
        .map(|user| parse_register_content(user)
            .ok_or_else(|| format!("invalid --user {:?}, expected username|password|nickname", user)))
        .collect()
}

/// Register the seed accounts.
async fn seed_users(store: Arc<dyn CredentialStore>, users: Vec<RegisterCredentials>) -> Result<(), String>
{
    for user in users
    {
        match store.register(&user.username, &user.password, &user.nickname).await
        {
            Ok(()) => tracing::info!(username = user.username, "seeded account"),
            Err(RegisterError::UsernameTaken) => tracing::info!(username = user.username, "account already exists"),
            Err(err) => return Err(err.to_string()),
        }
    }
    Ok(())
}

fn make_store(cli: &Cli, runtime: &enfync::builtin::native::TokioHandle) -> Result<Arc<dyn CredentialStore>, String>
{
    let users = parse_users(&cli.users)?;

    let store: Arc<dyn CredentialStore> = match cli.database.clone()
    {
        Some(url) =>
        {
            let pending = runtime.spawn(async move { SqliteCredentialStore::connect(&url).await });
            let store = enfync::blocking::extract(pending)
                .map_err(|err| format!("{:?}", err))?
                .map_err(|err| err.to_string())?;
            tracing::info!("using sqlite credential store");
            Arc::new(store)
        }
        None =>
        {
            tracing::info!("using in-memory credential store");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let pending = runtime.spawn(seed_users(store.clone(), users));
    enfync::blocking::extract(pending).map_err(|err| format!("{:?}", err))??;

    Ok(store)
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn main() -> Result<(), String>
{
    let cli = Cli::parse();
    init_logging(&cli);

    let runtime = enfync::builtin::native::TokioHandle::default();
    let store = make_store(&cli, &runtime)?;

    let config = ServerConfig{
            max_connections     : cli.max_connections,
            max_msg_size        : cli.max_msg_size,
            outbound_queue_size : cli.outbound_queue_size,
            chat_log_queue_size : cli.chat_log_queue_size,
            close_linger        : Duration::from_millis(cli.close_linger_ms),
            duplicate_login     : match cli.replace_duplicate_logins
            {
                true  => DuplicateLoginPolicy::ReplaceExisting,
                false => DuplicateLoginPolicy::Reject,
            },
            ..Default::default()
        };
    let server = ServerFactory::new(store)
        .new_server(runtime, cli.address.as_str(), config)
        .map_err(|err| err.to_string())?;
    tracing::info!(address = ?server.address(), "chat relay listening");

    // the relay runs on the runtime, we just watch
    while !server.is_dead()
    {
        while let Some(report) = server.next_report()
        {
            match report
            {
                ServerReport::Connected(id, address) => tracing::info!(id, ?address, "connected"),
                ServerReport::Authenticated(id, nickname) => tracing::info!(id, nickname, "logged in"),
                ServerReport::Disconnected(id) => tracing::info!(id, "disconnected"),
            }
        }
        tracing::debug!(connections = server.num_connections(), online = server.num_online(), "status");

        std::thread::sleep(Duration::from_millis(100));
    }

    Err(String::from("server stopped"))
}

//-------------------------------------------------------------------------------------------------------------------


//-------------------------------------------------------------------------------------------------------------------
