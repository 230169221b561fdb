use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use curio_agents::TaskInputs;
use curio_web::config::mask_secret;
use curio_web::queries::candidate_queries;
use curio_web::render::{render_plain, Outcome};
use curio_web::settings::{build_crew, resolve_provider_settings};
use curio_web::{serve, AppState, Config};

mod setup;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose: everything, including raw model replies
    Trace,
    /// Verbose: model requests, unparsed replies
    Debug,
    /// Standard: server start, one line per generation
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "curio")]
#[command(author, version, about = "Personalized content generator", long_about = None)]
pub struct Cli {
    /// Generate content for one query and print it instead of serving the UI
    #[arg(short, long)]
    pub query: Option<String>,

    /// Config file (default: ~/.config/curio/config.toml)
    #[arg(short, long, env = "CURIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model as provider/model (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Address for the web UI (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web UI (default)
    Serve,
    /// List the candidate queries offered in the dropdown
    Queries,
    /// Show the effective configuration
    Config,
    /// Write a starter config file to ~/.config/curio
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve log level: --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_filter()));

    if let Some(log_path) = &cli.log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        // Neither needs a usable config
        Some(Commands::Setup) => setup::run(),
        Some(Commands::Queries) => {
            for query in candidate_queries() {
                println!("{}", query);
            }
            Ok(())
        }
        Some(Commands::Config) => show_config(&load_config(&cli)?),
        Some(Commands::Serve) | None => {
            let config = load_config(&cli)?;
            if let Some(query) = &cli.query {
                query_mode(&config, query).await
            } else {
                serve_mode(&config).await
            }
        }
    }
}

/// Config file + environment, then CLI flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(temperature) = cli.temperature {
        config.llm.temperature = temperature;
    }
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }

    config
        .llm
        .llm_config()
        .validate()
        .context("Invalid command line settings")?;
    Ok(config)
}

async fn serve_mode(config: &Config) -> Result<()> {
    let crew = build_crew(config)?;
    let state = AppState::new(crew, candidate_queries());
    serve(state, &config.server.bind).await
}

async fn query_mode(config: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("No valid search entries found in the input.");
    }

    let crew = build_crew(config)?;
    match Outcome::from_result(crew.run(&TaskInputs::query(query.trim())).await) {
        Outcome::Content(content) => {
            println!("Generated Content:\n");
            print!("{}", render_plain(&content));
            Ok(())
        }
        Outcome::Error(message) | Outcome::Warning(message) => anyhow::bail!(message),
        Outcome::Idle => Ok(()),
    }
}

fn show_config(config: &Config) -> Result<()> {
    println!("Configuration:");
    println!("  Config file: {}", Config::config_path()?.display());

    println!("\nServer:");
    println!("  Bind: {}", config.server.bind);

    println!("\nLLM:");
    println!("  Model: {}", config.llm.model);
    println!("  Temperature: {}", config.llm.temperature);
    if let Some(max_tokens) = config.llm.max_tokens {
        println!("  Max tokens: {}", max_tokens);
    }
    println!("  JSON mode: {}", config.llm.json_mode);
    if let Some(timeout) = config.llm.request_timeout_secs {
        println!("  Request timeout: {}s", timeout);
    }
    match resolve_provider_settings(&config.llm) {
        Ok(settings) => {
            println!("  Provider: {}", settings.provider_name);
            println!("  Base URL: {}", settings.base_url);
            println!("  API key: {}", mask_secret(&settings.api_key));
        }
        Err(e) => println!("  Provider: (unusable: {})", e),
    }

    if !config.agent.is_empty() {
        println!("\nPersona overrides:");
        if let Some(role) = &config.agent.role {
            println!("  Role: {}", role);
        }
        if let Some(goal) = &config.agent.goal {
            println!("  Goal: {}", preview(goal));
        }
        if let Some(backstory) = &config.agent.backstory {
            println!("  Backstory: {}", preview(backstory));
        }
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > 60 {
        format!("{}...", flat.chars().take(60).collect::<String>())
    } else {
        flat
    }
}
