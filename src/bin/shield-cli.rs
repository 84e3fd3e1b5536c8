use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use security_shield::config::{load_config, AppConfig};
use security_shield::routing::ExclusionList;
use security_shield::security::{Action, MemorySink, RequestSnapshot, Shield};

#[derive(Parser)]
#[command(name = "shield-cli")]
#[command(about = "Offline tools for the Edge Request Security Shield", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single request without forwarding it
    Classify {
        /// Path and optional query, e.g. "/search?q=test"
        #[arg(short, long)]
        url: String,

        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(short = 'a', long, default_value = "")]
        user_agent: String,

        #[arg(short, long, default_value = "")]
        referer: String,

        /// Configuration file; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a configuration file
    CheckConfig {
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            url,
            method,
            user_agent,
            referer,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => AppConfig::default(),
            };
            let snapshot = RequestSnapshot::new(method.to_uppercase(), &url)
                .with_user_agent(user_agent)
                .with_referer(referer);
            print_json(&classify(&config, &snapshot)?)?;
        }
        Commands::CheckConfig { path } => {
            let config = load_config(&path)?;
            let shield = Shield::from_config(&config.shield)?;
            ExclusionList::new(config.exclusions.paths.iter().cloned())?;
            print_json(&json!({
                "valid": true,
                "bindAddress": config.listener.bind_address,
                "upstream": config.upstream.url,
                "blockStatus": shield.policy().block_status.as_u16(),
                "honeypotDelayMs": config.shield.honeypot_delay_ms,
                "exclusions": config.exclusions.paths.len(),
            }))?;
        }
    }

    Ok(())
}

fn classify(config: &AppConfig, snapshot: &RequestSnapshot) -> Result<Value, Box<dyn std::error::Error>> {
    let exclusions = ExclusionList::new(config.exclusions.paths.iter().cloned())?;
    if exclusions.is_excluded(&snapshot.path) {
        return Ok(json!({ "excluded": true, "action": "forward" }));
    }

    let sink = Arc::new(MemorySink::new());
    let shield = Shield::with_sink(&config.shield, sink.clone())?;
    let action = match shield.inspect(snapshot) {
        Action::Forward => json!("forward"),
        Action::Reject(rejection) => serde_json::to_value(rejection)?,
    };

    Ok(json!({
        "excluded": false,
        "decision": shield.classify(snapshot),
        "action": action,
        "event": sink.events().first(),
    }))
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
