use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use speckle::{format_error, AccountCache, Config, Response, SpeckleClient};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for a Speckle server
#[derive(Parser, Debug)]
#[command(name = "speckle", version, about, long_about = None)]
struct Args {
    /// Server URL, e.g. http://localhost:3000/api/v1 (defaults to the saved config)
    #[arg(short, long)]
    server: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and cache the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SPECKLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, then log in with it
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SPECKLE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short, long)]
        company: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
    },
    /// Remove the cached token for an account
    Logout {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List records of a resource (streams, projects, objects, ...)
    List { resource: String },
    /// Fetch one record by id
    Get { resource: String, id: String },
    /// Show cached accounts
    Accounts,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("speckle started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("speckle").join("speckle.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".speckle").join("speckle.log");
    }
    PathBuf::from("speckle.log")
}

fn open_cache() -> Result<AccountCache> {
    let path = AccountCache::default_path().context("No config directory for the account cache")?;
    Ok(AccountCache::open(path)?)
}

fn print_response(response: Response) -> Result<()> {
    let value = response.into_payload()?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Client authenticated with the cached token for `email` (or the default account)
fn cached_client(config: &Config, cache: &AccountCache) -> Result<SpeckleClient> {
    let mut client = SpeckleClient::new(config)?;

    let account = match config.email.as_deref() {
        Some(email) => cache.get_account(client.server(), email),
        None => cache
            .default_account()
            .filter(|a| a.rest_api == client.server()),
    };

    match account {
        Some(account) => {
            tracing::debug!("Using cached token for {}", account.email);
            client.set_token(&account.token);
        },
        None => tracing::warn!("No cached account for {}, continuing anonymously", client.server()),
    }

    Ok(client)
}

async fn run(args: Args) -> Result<()> {
    let saved = Config::load();
    let config = match args.server.as_deref() {
        Some(server) => saved.with_server(server)?,
        None => saved,
    };

    match args.command {
        Command::Login { email, password } => {
            let mut client = SpeckleClient::new(&config)?;
            client.login(&email, &password).await?;
            remember(&config, &client, &email)?;
            println!("Logged in as {}", email);
        },
        Command::Register {
            email,
            password,
            company,
            name,
            surname,
        } => {
            let mut client = SpeckleClient::new(&config)?;
            client
                .register(&email, &password, &company, name.as_deref(), surname.as_deref())
                .await?;
            remember(&config, &client, &email)?;
            println!("Registered and logged in as {}", email);
        },
        Command::Logout { email } => {
            let Some(email) = email.or_else(|| config.email.clone()) else {
                anyhow::bail!("No account given and none saved in config");
            };
            let mut cache = open_cache()?;
            if cache.delete_account(&config.server_url(), &email)? {
                println!("Removed {}", email);
            } else {
                println!("{} was not cached for {}", email, config.server_url());
            }
        },
        Command::List { resource } => {
            let cache = open_cache()?;
            let client = cached_client(&config, &cache)?;
            let response = client.resource_by_name(&resource)?.list().await?;
            print_response(response)?;
        },
        Command::Get { resource, id } => {
            let cache = open_cache()?;
            let client = cached_client(&config, &cache)?;
            let response = client.resource_by_name(&resource)?.get(&id).await?;
            print_response(response)?;
        },
        Command::Accounts => {
            let cache = open_cache()?;
            for account in cache.get_all_accounts() {
                println!(
                    "{}{}  {}  ({})  added {}",
                    if account.is_default { "* " } else { "  " },
                    account.email,
                    account.rest_api,
                    account.server_name,
                    account.added_at.format("%Y-%m-%d %H:%M")
                );
            }
        },
    }

    Ok(())
}

/// Cache the session token and save the account as the config default.
/// Only the email is written back; a `--server` override is not persisted.
fn remember(config: &Config, client: &SpeckleClient, email: &str) -> Result<()> {
    let Some(token) = client.token() else {
        return Ok(());
    };

    let mut cache = open_cache()?;
    cache.store_token(client.server(), &config.effective_host(), email, token)?;

    let mut saved = Config::load();
    saved.set_email(email)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Keep guard alive for the duration of the program
    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        match err.downcast_ref::<speckle::Error>() {
            Some(e) => eprintln!("Error: {}", format_error(e)),
            None => eprintln!("Error: {err:#}"),
        }
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}
