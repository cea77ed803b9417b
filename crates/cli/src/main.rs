use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mango")]
#[command(about = "Agent Mango — XMTP intent listener and agent discovery server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the service: XMTP listener plus the health/agent-card HTTP server.
    /// Without XMTP_WALLET_KEY (or xmtp.walletKey in config) only the HTTP
    /// surface runs.
    Serve {
        /// Config file path (default: MANGO_CONFIG_PATH or ~/.mango/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 3000; overrides the PORT env)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Print the agent card JSON to stdout
    Card,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("mango {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Card) => match serde_json::to_string_pretty(lib::card::agent_card()) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                log::error!("rendering agent card failed: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = lib::config::load_config(config_path)?;
    // Port precedence: CLI flag, then PORT env, then config file.
    config.server.port = port.unwrap_or_else(|| lib::config::resolve_port(&config));
    log::info!(
        "starting agent mango on {}:{}",
        config.server.bind,
        config.server.port
    );
    lib::server::serve(config).await
}
