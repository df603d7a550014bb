use clap::arg;
use clap::command;
use clap::Parser;
use reqwest::Client;
use push_relay::server;
use push_relay::store;
use push_relay::utils::config_loader;
use push_relay::utils::logging;
use anyhow::Result;
use push_relay::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "push-relay.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args
    // -------------------------------

    let args = Args::parse();

    // -------------------------------
    // 2. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config)?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 3. Resolve key-value store
    // -------------------------------

    let kv_store = store::build_store(&service_config.store).await?;

    // -------------------------------
    // 4. Create request client
    // -------------------------------

    let client = Client::new();

    // -------------------------------
    // 5. Start http server
    // -------------------------------

    info!("Service starting...");
    let http_server = server::server::start(&service_config, kv_store, client);

    tokio::select! {
        res = http_server => res?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    Ok(())
}
