//! prompt-relay: HTTP relay for OpenAI-compatible completion APIs
//!
//! A small service that accepts a question or chat message over HTTP,
//! forwards it upstream with a fixed persona and returns the model's text:
//! - `/ask` via chat completions
//! - `/chat` via the responses API
//! - `/health` liveness probe

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

use prompt_relay::{config::load_env_files, run_server, AppConfig, OpenAiClient};

#[derive(Parser)]
#[command(name = "prompt-relay")]
#[command(version = "0.1.0")]
#[command(about = "HTTP relay for OpenAI-compatible completion APIs")]
#[command(long_about = "
prompt-relay accepts questions and chat messages over HTTP and relays them
to an OpenAI-compatible API:
  - POST /ask   {\"question\": ...} -> {\"answer\": ...}
  - POST /chat  {\"message\": ...}  -> {\"reply\": ...}
  - GET  /health

The API key is read from OPENAI_API_KEY (a .env file in the working
directory is loaded first).

Example usage:
  prompt-relay run --port 5000
  prompt-relay --config config.yaml check-config
")]
struct Cli {
    /// Path to config file (defaults to ./config.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override listen address
        #[arg(long)]
        host: Option<String>,
        /// Override upstream API base URL (e.g., "https://api.openai.com/v1")
        #[arg(long)]
        upstream_url: Option<String>,
    },

    /// Validate configuration file
    CheckConfig,

    /// Test connection and credentials against the upstream API
    TestUpstream,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    for path in load_env_files() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Run {
            port,
            host,
            upstream_url,
        } => {
            run_relay(cli.config.as_deref(), port, host, upstream_url).await?;
        }
        Commands::CheckConfig => {
            check_config(cli.config.as_deref());
        }
        Commands::TestUpstream => {
            test_upstream(cli.config.as_deref()).await?;
        }
    }

    Ok(())
}

/// Run the relay server
async fn run_relay(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<String>,
    upstream_url_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_or_exit(config_path);

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(host) = host_override {
        config.server.host = host;
    }
    if let Some(url) = upstream_url_override {
        config.upstream.url = url;
    }

    if let Err(e) = config.validate() {
        eprintln!("✗ Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Some(path) = config_path {
        tracing::info!("Loaded configuration from {:?}", path);
    }

    run_server(config).await
}

/// Validate configuration file
fn check_config(config_path: Option<&Path>) {
    let config = match AppConfig::load_or_default(config_path).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Configuration is valid\n");
    println!("Server:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("\nUpstream:");
    println!("  URL: {}", config.upstream.base_url());
    println!("  TLS: {}", if config.upstream.is_tls() { "enabled" } else { "disabled" });
    if let Some(ref tls) = config.upstream.tls {
        if tls.accept_invalid_certs {
            println!("  TLS: Accepting invalid certificates");
        }
        if let Some(ref ca) = tls.ca_cert_path {
            println!("  TLS CA: {}", ca);
        }
    }
    println!("  Timeout: {}s", config.upstream.timeout_seconds);
    match config.upstream.resolve_api_key() {
        Ok(_) => println!("  API key: present"),
        Err(e) => println!("  API key: ✗ {}", e),
    }
    println!("\nRelay:");
    println!("  Service: {}", config.relay.service_name);
    println!(
        "  /ask:  {} (model {})",
        if config.relay.ask.enabled { "enabled" } else { "disabled" },
        config.relay.ask.model
    );
    println!(
        "  /chat: {} (model {})",
        if config.relay.chat.enabled { "enabled" } else { "disabled" },
        config.relay.chat.model
    );
    println!("\nStats:");
    println!("  Enabled: {}", config.stats.enabled);
    println!("  Format: {:?}", config.stats.format);
}

/// Test connection and credentials against upstream
async fn test_upstream(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_exit(config_path);
    let client = OpenAiClient::from_config(&config.upstream)?;

    println!("Testing upstream: {}/models", client.base_url());

    match client.list_models().await {
        Ok(models) => {
            println!("✓ Upstream is reachable and the API key was accepted");
            println!("  Available models: {}", models.data.len());
            for model in models.data.iter().take(5) {
                println!("    - {}", model.id);
            }
            for wanted in [&config.relay.ask.model, &config.relay.chat.model] {
                if !models.data.iter().any(|m| &m.id == wanted) {
                    println!("  ! Configured model '{}' not listed by upstream", wanted);
                }
            }
        }
        Err(e) => {
            println!("✗ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: Option<&Path>) -> AppConfig {
    match AppConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            eprintln!("\nYou can copy config.yaml.default and modify it:");
            eprintln!("  cp config.yaml.default config.yaml");
            std::process::exit(1);
        }
    }
}
