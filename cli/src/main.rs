//! Terminal client for the chat room.
//!
//! `login` and `register` talk to the REST backend, `chat` joins the realtime
//! room. The credential persists in a JSON store file between runs.

mod chat;
mod http;
mod render;
mod socket;
mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;

use chatroom::api::ApiClient;
use chatroom::config::{API_URL_VAR, ClientConfig, IDENTITY_TIMEOUT_VAR, REALTIME_URL_VAR};
use chatroom::state::auth::{self, Credentials};
use chatroom::storage::TokenStore;

use crate::chat::{ChatError, ChatExit};
use crate::http::ReqwestHttp;
use crate::socket::TungsteniteConnector;
use crate::store::FileStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no store location; pass --store or set CHAT_STORE")]
    NoStorePath,
    #[error("{0}")]
    Auth(&'static str),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chatroom-cli", about = "Terminal client for the chat room")]
struct Cli {
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<String>,

    #[arg(long, env = REALTIME_URL_VAR)]
    realtime_url: Option<String>,

    #[arg(long, env = IDENTITY_TIMEOUT_VAR)]
    identity_timeout_secs: Option<u64>,

    #[arg(long, env = "CHAT_STORE", help = "Credential store file")]
    store: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output on stderr")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the returned credential.
    Login(AuthArgs),
    /// Create an account. Does not log in.
    Register(AuthArgs),
    /// Forget the stored credential.
    Logout,
    /// Join the chat room. Type `/quit` to leave, `/logout` to leave and log out.
    Chat {
        #[arg(long, default_value_t = 80, help = "Column own messages are aligned to")]
        width: usize,
    },
}

#[derive(Args, Debug)]
struct AuthArgs {
    username: String,

    #[arg(long, env = "CHAT_PASSWORD", help = "Read from stdin when omitted")]
    password: Option<String>,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let timeout = self.identity_timeout_secs.map(|secs| secs.to_string());
        ClientConfig::from_lookup(|key| match key {
            API_URL_VAR => self.api_url.clone(),
            REALTIME_URL_VAR => self.realtime_url.clone(),
            IDENTITY_TIMEOUT_VAR => timeout.clone(),
            _ => None,
        })
    }

    fn store(&self) -> Result<FileStore, CliError> {
        self.store
            .clone()
            .or_else(store::default_path)
            .map(FileStore::new)
            .ok_or(CliError::NoStorePath)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    let tokens = TokenStore::new(cli.store()?);

    match cli.command {
        Command::Login(args) => run_login(&config, &tokens, args).await,
        Command::Register(args) => run_register(&config, &tokens, args).await,
        Command::Logout => {
            tokens.clear();
            println!("logged out");
            Ok(())
        }
        Command::Chat { width } => run_chat(&config, &tokens, width).await,
    }
}

fn credentials(args: AuthArgs) -> Result<Credentials, CliError> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    auth::validate(&args.username, &password).map_err(CliError::Auth)
}

fn prompt_password() -> Result<String, CliError> {
    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn api(config: &ClientConfig, tokens: &TokenStore<FileStore>) -> Result<ApiClient<ReqwestHttp, FileStore>, CliError> {
    Ok(ApiClient::new(config.api_base_url.clone(), ReqwestHttp::new()?, tokens.clone()))
}

async fn run_login(config: &ClientConfig, tokens: &TokenStore<FileStore>, args: AuthArgs) -> Result<(), CliError> {
    let credentials = credentials(args)?;
    auth::submit_login(&api(config, tokens)?, tokens, &credentials)
        .await
        .map_err(CliError::Auth)?;
    println!("logged in as {}", credentials.username);
    Ok(())
}

async fn run_register(config: &ClientConfig, tokens: &TokenStore<FileStore>, args: AuthArgs) -> Result<(), CliError> {
    let credentials = credentials(args)?;
    auth::submit_register(&api(config, tokens)?, &credentials)
        .await
        .map_err(CliError::Auth)?;
    println!("registered {}; run `chatroom-cli login {}` next", credentials.username, credentials.username);
    Ok(())
}

/// Forward stdin lines from a plain thread so the runtime never blocks on
/// the terminal at shutdown.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn run_chat(config: &ClientConfig, tokens: &TokenStore<FileStore>, width: usize) -> Result<(), CliError> {
    let exit = chat::run(TungsteniteConnector, tokens, config, stdin_lines(), &mut |line| println!("{line}"), width).await?;
    match exit {
        ChatExit::Quit => {}
        ChatExit::LoggedOut => println!("logged out"),
        ChatExit::Disconnected => println!("-- disconnected --"),
    }
    Ok(())
}
