use anyhow::Result;
use chat_relay::config::{Config, DEFAULT_CONFIG_FILE};
use chat_relay::telemetry::init_telemetry;
use chat_relay::{runtime, Relay};
use clap::Parser;
use clap_serde_derive::ClapSerde;
use tracing::{error, info};

macro_rules! exit_err {
    ($code:expr, $fmt:expr $(, $arg:expr)*) => {
        {
            error!($fmt $(, $arg)*);
            std::process::exit($code);
        }
    };
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = match Config::load(&args.config_file, args.opt_config) {
        Ok(config) => config,
        Err(err) => {
            // The subscriber is not installed yet, fall back to the default text output
            init_telemetry(Default::default());
            exit_err!(1, "Failed to load configuration: {}", err);
        }
    };
    init_telemetry(config.log_format());

    let relay = match Relay::new(config) {
        Ok(relay) => relay,
        Err(err) => exit_err!(1, "Failed to initialize relay: {}", err),
    };
    info!(
        endpoint = relay.config().fastapi_endpoint(),
        model = relay.config().model_id(),
        "Relay initialized"
    );

    runtime::run(relay).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
