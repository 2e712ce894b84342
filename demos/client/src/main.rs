//local shortcuts
use chat_relay::*;

//third-party shortcuts
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

//standard shortcuts
use std::io::BufRead;
use std::net::SocketAddr;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

const HELP: &str = "commands:
  /register <username> <password> <nickname>
  /login <username> <password>
  /quit
anything else is sent to the room";

//-------------------------------------------------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "chat_relay-client", about = "Line-oriented chat relay client")]
struct Cli
{
    /// Relay address.
    #[arg(long, default_value = "127.0.0.1:8888")]
    address: SocketAddr,

    /// Log filter, overridden by `RUST_LOG`.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

//-------------------------------------------------------------------------------------------------------------------

/// A parsed input line.
#[derive(Debug, Eq, PartialEq)]
enum Input
{
    Register{ username: String, password: String, nickname: String },
    Login{ username: String, password: String },
    Chat(String),
    Quit,
    Invalid,
}

fn parse_input(line: &str) -> Input
{
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else { return Input::Chat(String::from(line)); };

    let words: Vec<&str> = command.split_whitespace().collect();
    match words.as_slice()
    {
        ["register", username, password, nickname] => Input::Register{
                username: String::from(*username),
                password: String::from(*password),
                nickname: String::from(*nickname),
            },
        ["login", username, password] => Input::Login{
                username: String::from(*username),
                password: String::from(*password),
            },
        ["quit"] => Input::Quit,
        _ => Input::Invalid,
    }
}

//-------------------------------------------------------------------------------------------------------------------

fn print_envelope(envelope: &Envelope)
{
    match envelope.kind
    {
        EnvelopeKind::Chat => println!("[{}] {}", envelope.sender, envelope.content),
        EnvelopeKind::LoginOk | EnvelopeKind::RegisterOk => println!("* {}", envelope.content),
        EnvelopeKind::LoginFail | EnvelopeKind::RegisterFail | EnvelopeKind::Rejected =>
        {
            println!("! {}", envelope.content)
        }
        other => tracing::warn!(?other, "unexpected envelope from relay"),
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Forward stdin lines to a channel so the main loop can poll them.
fn spawn_stdin_reader() -> crossbeam::channel::Receiver<String>
{
    let (sender, receiver) = crossbeam::channel::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines()
        {
            let Ok(line) = line else { break; };
            if sender.send(line).is_err() { break; }
        }
    });
    receiver
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

fn main()
{
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let client = ClientFactory::default().new_client(enfync::builtin::native::TokioHandle::default(), cli.address);
    let lines = spawn_stdin_reader();
    println!("{}", HELP);

    loop
    {
        while let Some(event) = client.next()
        {
            match event
            {
                ClientEvent::Report(ClientReport::Connected) => println!("* connected to {}", client.server_address()),
                ClientEvent::Report(ClientReport::Disconnected) => println!("* disconnected"),
                ClientEvent::Report(ClientReport::ClosedBySelf) => println!("* bye"),
                ClientEvent::Report(ClientReport::IsDead) => return,
                ClientEvent::Msg(envelope) => print_envelope(&envelope),
            }
        }

        while let Ok(line) = lines.try_recv()
        {
            let result = match parse_input(&line)
            {
                Input::Register{ username, password, nickname } => client.register(&username, &password, &nickname),
                Input::Login{ username, password } => client.login(&username, &password),
                Input::Chat(content) if content.is_empty() => Ok(()),
                Input::Chat(content) => client.chat(content),
                Input::Quit => { client.close(); Ok(()) }
                Input::Invalid => { println!("{}", HELP); Ok(()) }
            };
            if let Err(err) = result { println!("! {}", err); }
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

//-------------------------------------------------------------------------------------------------------------------


//-------------------------------------------------------------------------------------------------------------------
