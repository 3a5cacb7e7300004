//! Dashboard CLI: composes a remote service's observability endpoints.
//!
//! The `metrics` subcommand exercises the consuming side of the text
//! exposition format; the others print the JSON endpoints verbatim.

use clap::{Parser, Subcommand};
use serde_json::Value;

use metrics_hub::registry::exposition;

#[derive(Parser)]
#[command(name = "hub-cli")]
#[command(about = "Dashboard CLI for metrics-hub services", long_about = None)]
struct Cli {
    /// Base URL of the target service.
    #[arg(short, long, default_value = "http://localhost:9090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and parse the service's /metrics exposition
    Metrics,
    /// Fetch the service's /health verdict
    Health,
    /// Fetch the dashboard summary
    Summary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Metrics => {
            let res = client
                .get(format!("{}/metrics", cli.url))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: /metrics returned status {}", status);
                return Ok(());
            }
            let body = res.text().await?;
            for (name, value) in exposition::parse(&body) {
                println!("{:<60} {}", name, value);
            }
        }
        Commands::Health => {
            let res = client
                .get(format!("{}/health", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Summary => {
            let res = client
                .get(format!("{}/api/summary", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() && status != reqwest::StatusCode::SERVICE_UNAVAILABLE {
        eprintln!("Error: endpoint returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
