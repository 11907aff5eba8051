//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod render;
pub mod sessions;
pub mod settings;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::chat::run_chat;
use crate::cli::settings::{edit_settings, SettingRegistry};
use crate::core::config::{path_display, Config, ConfigKey};
use crate::core::keyring::{api_key_from_env, delete_api_key, store_api_key};
use crate::core::settings::Settings;
use crate::core::store::{Store, StoreKey};
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ")\nbuilt: ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser)]
#[command(name = "chairchat")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client for Gemini with personas, sessions and The Chair")]
#[command(
    long_about = "Chairchat is a line-oriented chat client for Google's Gemini API. \
Conversations are kept in local sessions, titled automatically after the first exchange, \
and a separate conversation with The Chair is always one command away.\n\n\
Authentication:\n\
  Use 'chairchat auth' to store your API key in the system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    API key (takes precedence over the keyring)\n\
  API_KEY           Fallback API key variable\n\
  CHAIRCHAT_CONFIG  Alternate config.toml path\n\
  CHAIRCHAT_LOG     Log filter, e.g. 'chairchat=debug'\n\n\
Inside the chat, type /help for commands."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to this file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Start the chat interface talking to The Chair
    Chair,
    /// List saved sessions
    Sessions,
    /// Rename a session
    Rename {
        /// Session number or id prefix, as shown by `chairchat sessions`
        session: String,
        /// New title
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Delete a session
    Delete {
        /// Session number or id prefix
        session: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the chat settings (language, personas, base URL)
    Settings,
    /// Change a chat setting
    Set {
        /// Setting key
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Reset a chat setting to its default
    Unset {
        /// Setting key
        key: String,
    },
    /// Show or edit config.toml
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Store an API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a config value
    Set { key: String, value: String },
    /// Remove a config value, restoring its default
    Unset { key: String },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&Config::load()?, false).await,
        Commands::Chair => run_chat(&Config::load()?, true).await,
        Commands::Sessions => {
            let store = data_store()?;
            print!("{}", sessions::list(&store));
            Ok(())
        }
        Commands::Rename { session, title } => {
            let store = data_store()?;
            let title = title.join(" ");
            match sessions::rename(&store, &session, &title) {
                Ok(()) => println!("✅ Renamed session to: {}", title.trim()),
                Err(err) => exit_with(&err),
            }
            Ok(())
        }
        Commands::Delete { session, yes } => {
            let store = data_store()?;
            let Some((id, title)) = sessions::find(&store, &session) else {
                exit_with(&sessions::SessionCommandError::NotFound(session));
            };
            if !yes && !confirm(&format!("Delete \"{title}\"?"))? {
                println!("Kept \"{title}\".");
                return Ok(());
            }
            match sessions::delete(&store, &id) {
                Ok(()) => println!("✅ Deleted \"{title}\""),
                Err(err) => exit_with(&err),
            }
            Ok(())
        }
        Commands::Settings => {
            let store = data_store()?;
            let settings = store
                .load::<Settings>(StoreKey::Settings)
                .unwrap_or_else(Settings::detect);
            println!("Settings ({}):", path_display(store.path_for(StoreKey::Settings)));
            println!("{}", SettingRegistry::new().format_all(&settings));
            Ok(())
        }
        Commands::Set { key, value } => {
            let store = data_store()?;
            let registry = SettingRegistry::new();
            let result = match registry.get(&key) {
                Some(handler) => edit_settings(&store, |settings| handler.set(&value, settings)),
                None => Err(settings::SettingError::UnknownKey(key)),
            };
            report_setting(result);
            Ok(())
        }
        Commands::Unset { key } => {
            let store = data_store()?;
            let registry = SettingRegistry::new();
            let result = match registry.get(&key) {
                Some(handler) => edit_settings(&store, |settings| handler.unset(settings)),
                None => Err(settings::SettingError::UnknownKey(key)),
            };
            report_setting(result);
            Ok(())
        }
        Commands::Config { command } => handle_config(command),
        Commands::Auth => {
            if api_key_from_env().is_some() {
                println!("ℹ️  An API key is set in the environment; it takes precedence over the keyring.");
            }
            let key = read_line("Enter your Gemini API key: ")?;
            if key.trim().is_empty() {
                eprintln!("❌ No key entered");
                std::process::exit(1);
            }
            if let Err(err) = store_api_key(&key) {
                eprintln!("❌ Authentication failed: {err}");
                std::process::exit(1);
            }
            println!("✅ API key stored in the system keyring");
            Ok(())
        }
        Commands::Deauth => {
            match delete_api_key() {
                Ok(true) => println!("✅ API key removed from the system keyring"),
                Ok(false) => println!("No API key was stored"),
                Err(err) => {
                    eprintln!("❌ Deauthentication failed: {err}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}

fn data_store() -> Result<Store, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(Store::new(config.data_dir()?))
}

fn handle_config(command: Option<ConfigCommands>) -> Result<(), Box<dyn Error>> {
    match command {
        None => {
            let config = Config::load()?;
            println!("Config ({}):", path_display(Config::config_path()?));
            config.print_all();
        }
        Some(ConfigCommands::Set { key, value }) => {
            let Some(config_key) = ConfigKey::from_name(&key) else {
                eprintln!("❌ Unknown config key: {key}");
                std::process::exit(1);
            };
            match Config::mutate(|config| Ok(config.set_value(config_key, &value))) {
                Ok(Ok(())) => println!("✅ Set {} to: {}", config_key.name(), value.trim()),
                Ok(Err(message)) => {
                    eprintln!("❌ {message}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err),
            }
        }
        Some(ConfigCommands::Unset { key }) => {
            let Some(config_key) = ConfigKey::from_name(&key) else {
                eprintln!("❌ Unknown config key: {key}");
                std::process::exit(1);
            };
            Config::mutate(|config| {
                config.unset_value(config_key);
                Ok(())
            })?;
            println!("✅ Unset {}", config_key.name());
        }
    }
    Ok(())
}

fn report_setting(result: Result<String, settings::SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

fn exit_with(err: &sessions::SessionCommandError) -> ! {
    eprintln!("❌ {err}");
    std::process::exit(1);
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(question: &str) -> io::Result<bool> {
    let answer = read_line(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
