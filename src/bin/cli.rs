use std::path::PathBuf;

use anyhow::{Context, Result};
use chat_relay::config::{Config, DEFAULT_CONFIG_FILE};
use chat_relay::models::conversation::ConversationHistory;
use chat_relay::models::event::ChatRequest;
use chat_relay::telemetry::init_telemetry;
use chat_relay::Relay;
use clap::Parser;
use clap::Subcommand;
use clap_serde_derive::ClapSerde;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(author, version, about = "Drive the chat relay locally", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Configuration options
    #[command(flatten)]
    opt_config: <Config as ClapSerde>::Opt,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message through the relay
    Chat {
        /// Message to send
        #[clap(short, long)]
        message: String,

        /// JSON file holding the conversation history to continue
        #[clap(long)]
        history_file: Option<PathBuf>,
    },
    /// Feed a saved invocation event through the relay
    Replay {
        /// JSON file holding the invocation event
        #[clap(short, long)]
        event_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config_file, args.opt_config)?;
    init_telemetry(config.log_format());
    let relay = Relay::new(config)?;

    let event = match args.cmd {
        Commands::Chat {
            message,
            history_file,
        } => {
            let conversation_history = match history_file {
                Some(path) => Some(read_json::<ConversationHistory>(&path)?),
                None => None,
            };
            let request = ChatRequest {
                message,
                conversation_history,
            };
            json!({ "body": serde_json::to_string(&request)? })
        }
        Commands::Replay { event_file } => read_json::<Value>(&event_file)?,
    };

    let response = relay.handle(event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&str).with_context(|| format!("Failed to parse {}", path.display()))
}
