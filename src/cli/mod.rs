//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, sets up logging and provider
//! credentials, and dispatches to the interactive loop, the one-shot `say`
//! command, the web server or the settings commands.

pub mod chat;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::chat::run_chat;
use crate::cli::say::run_say;
use crate::cli::settings::SettingRegistry;
use crate::core::app::App;
use crate::core::config::{Config, ConfigOrchestrator};
use crate::core::error::ChatError;
use crate::core::personality::Personality;
use crate::core::provider::{ProviderSet, RequestSettings};
use crate::core::providers::{
    resolve_credentials, resolve_preferred, EnvSource, ProviderResolutionError,
};

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "BANTER_LOG";

#[derive(Parser, Debug)]
#[command(name = "banter", version)]
#[command(about = "Chat with Claude or ChatGPT, alone or with a group of AI friends")]
#[command(
    long_about = "Banter is a terminal chatbot that talks to Anthropic's Claude or OpenAI's \
ChatGPT. The main bot can take on different personalities, and you can add friends with \
their own personalities, talk to one of them, or start a group chat where every friend \
answers in turn.\n\n\
Environment Variables:\n\
  ANTHROPIC_API_KEY    API key for Claude\n\
  OPENAI_API_KEY       API key for ChatGPT\n\
  ANTHROPIC_BASE_URL   Custom Claude API base URL (optional)\n\
  OPENAI_BASE_URL      Custom ChatGPT API base URL (optional)\n\
  BANTER_LOG           Log filter for diagnostics on stderr (default: warn)\n\n\
Keys may also be kept in a .env file in the working directory.\n\n\
Commands:\n\
  /help             List all chat commands\n\
  /addfriend        Add a friend persona\n\
  /groupchat        Start a group chat with friends\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to use (claude or chatgpt)
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Personality for the main bot
    #[arg(short = 'P', long, global = true, value_name = "PERSONALITY")]
    pub personality: Option<String>,

    /// Path to the config file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Talk to this configured friend instead of the main bot
        #[arg(short = 'f', long)]
        friend: Option<String>,
        /// Message to send
        #[arg(trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Serve the web chat UI and JSON API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 5500)]
        port: u16,
    },
    /// Set configuration values, or show them all when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (default-model takes a provider and a model)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
        /// Provider or friend name for keyed settings
        value: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

/// Diagnostics go to stderr so they never mix with chat output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // A missing .env is normal; keys may come from the environment.
    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "loaded .env");
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let store = ConfigOrchestrator::new(config_path);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            match SettingRegistry::new().apply(key.as_deref(), &value, &store) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        Commands::Unset { key, value } => {
            match SettingRegistry::new().unset(&key, value.as_deref(), &store) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        command => {
            let config = store.load_with_cache()?;
            let app = match build_app(
                &config,
                args.provider.as_deref(),
                args.personality.as_deref(),
            ) {
                Ok(app) => app,
                Err(StartupError::Provider(err)) => exit_with_quick_fixes(&err),
                Err(StartupError::Chat(err)) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            };

            match command {
                Commands::Say { friend, prompt } => run_say(app, prompt, friend).await,
                Commands::Serve { host, port } => crate::server::run(app, &host, port).await,
                _ => run_chat(app).await,
            }
        }
    }
}

#[derive(Debug)]
enum StartupError {
    Provider(ProviderResolutionError),
    Chat(ChatError),
}

fn exit_with_quick_fixes(err: &ProviderResolutionError) -> ! {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
    std::process::exit(err.exit_code());
}

fn build_app(
    config: &Config,
    provider: Option<&str>,
    personality: Option<&str>,
) -> Result<App, StartupError> {
    let personality = personality
        .map(|label| {
            label
                .parse::<Personality>()
                .map_err(|_| StartupError::Chat(ChatError::invalid_personality(label)))
        })
        .transpose()?;

    let preferred = resolve_preferred(config, provider).map_err(StartupError::Provider)?;
    let credentials = resolve_credentials(&EnvSource, config);
    if credentials.is_empty() {
        return Err(StartupError::Provider(
            ProviderResolutionError::missing_authentication(),
        ));
    }

    let providers =
        ProviderSet::from_credentials(preferred, credentials, RequestSettings::from_config(config));
    let mut app = App::from_config(config, providers);

    if let Some(personality) = personality {
        app.session.set_personality(personality);
    }
    if !app.providers.is_available(preferred) {
        if let Some(fallback) = app.providers.active() {
            app.warning(format!(
                "{} not available, using {} instead...",
                preferred.display_name(),
                fallback.display_name()
            ));
        }
    }
    Ok(app)
}
