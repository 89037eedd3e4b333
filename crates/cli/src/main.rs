use clap::{Parser, Subcommand};
use lib::channels::TelegramChannel;
use lib::handler::WebhookEvent;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hello-bot")]
#[command(about = "Hello Bot: Telegram webhook that says hello", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Serve the webhook over HTTP (POST /invoke for function events, POST /webhook for raw Telegram updates).
    Serve {
        /// Config file path (default: HELLO_BOT_CONFIG_PATH or ~/.hello-bot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from config or 8080)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Run one function event ({"body": "<update json>"}) and print the response. Use "-" to read stdin.
    Invoke {
        /// Config file path (default: HELLO_BOT_CONFIG_PATH or ~/.hello-bot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Event JSON file, or "-" for stdin.
        #[arg(value_name = "EVENT")]
        event: PathBuf,
    },

    /// Inspect or change the bot's Telegram webhook.
    Webhook {
        /// Config file path (default: HELLO_BOT_CONFIG_PATH or ~/.hello-bot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        #[command(subcommand)]
        action: WebhookAction,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Print getWebhookInfo.
    Info,
    /// Point the webhook at URL (default: telegram.webhookUrl from config).
    Set {
        #[arg(value_name = "URL")]
        url: Option<String>,
    },
    /// Remove the webhook.
    Delete,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("hello-bot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Invoke { config, event }) => {
            if let Err(e) = run_invoke(config, event).await {
                log::error!("invoke failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Webhook { config, action }) => {
            if let Err(e) = run_webhook(config, action).await {
                log::error!("webhook failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, _) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }
    log::info!("starting hello-bot on {}:{}", config.server.bind, config.server.port);
    lib::server::run_server(config).await
}

async fn run_invoke(config_path: Option<PathBuf>, event_path: PathBuf) -> anyhow::Result<()> {
    let (config, _) = lib::config::load_config(config_path)?;
    let raw = if event_path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(&event_path)?
    };
    let event: WebhookEvent = serde_json::from_str(&raw)?;
    let dispatcher = lib::runtime::dispatcher(&config).await?;
    let response = dispatcher.handle(&event).await?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn run_webhook(config_path: Option<PathBuf>, action: WebhookAction) -> anyhow::Result<()> {
    let (config, _) = lib::config::load_config(config_path)?;
    let telegram = TelegramChannel::from_config(&config);
    if !telegram.has_token() {
        anyhow::bail!("bot token not configured: set BOT_TOKEN or telegram.botToken");
    }
    match action {
        WebhookAction::Info => {
            let info = telegram.get_webhook_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            if info.url.is_empty() {
                println!("webhook is not set");
            }
            if let Some(expected) = config.telegram.webhook_url.as_deref() {
                if info.points_to(expected) {
                    println!("webhook URL matches telegram.webhookUrl");
                } else {
                    println!(
                        "webhook URL mismatch. Expected: {}, Actual: {}",
                        expected, info.url
                    );
                }
            }
        }
        WebhookAction::Set { url } => {
            let url = url
                .or_else(|| config.telegram.webhook_url.clone())
                .ok_or_else(|| anyhow::anyhow!("no URL given and telegram.webhookUrl is not set"))?;
            telegram.set_webhook(&url).await?;
            println!("webhook set to {}", url);
        }
        WebhookAction::Delete => {
            telegram.delete_webhook().await?;
            println!("webhook deleted");
        }
    }
    Ok(())
}
