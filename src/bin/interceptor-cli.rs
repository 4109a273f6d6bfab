use clap::{Parser, Subcommand};
use std::path::PathBuf;

use playlist_interceptor::codec::{self, UrlCodec, DEFAULT_MARKER};
use playlist_interceptor::config::load_config;
use playlist_interceptor::dispatch::{Dispatcher, InterceptionDecision};
use playlist_interceptor::http::server::SystemStatus;

#[derive(Parser)]
#[command(name = "interceptor-cli")]
#[command(about = "Tools for working with marked playlist URLs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark a URL for interception
    Encode {
        url: String,
        #[arg(short, long, default_value_t = DEFAULT_MARKER)]
        marker: char,
    },
    /// Strip the interception marker from a URL
    Decode {
        url: String,
        #[arg(short, long, default_value_t = DEFAULT_MARKER)]
        marker: char,
    },
    /// Show what the interceptor would do with a URL
    Resolve {
        url: String,
        #[arg(short, long, default_value = "interceptor.toml")]
        config: PathBuf,
        /// Scheme to classify (defaults to the URL's own scheme)
        #[arg(short, long)]
        scheme: Option<String>,
    },
    /// Query a running interceptor
    Status {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { url, marker } => {
            println!("{}", UrlCodec::new(marker).encode(&url));
        }
        Commands::Decode { url, marker } => {
            println!("{}", UrlCodec::new(marker).decode(&url));
        }
        Commands::Resolve { url, config, scheme } => {
            let config = load_config(&config)?;
            let dispatcher = Dispatcher::from_config(&config)?;
            let scheme = scheme
                .as_deref()
                .or_else(|| codec::scheme_of(&url))
                .unwrap_or_default();

            match dispatcher.handle(&url, scheme) {
                InterceptionDecision::ServeInline(content) => {
                    println!("serve inline ({} bytes)", content.len());
                    println!("{}", String::from_utf8_lossy(&content));
                }
                InterceptionDecision::Redirect(target) => {
                    println!(
                        "redirect {} -> {}",
                        config.interceptor.redirect_status, target
                    );
                }
                InterceptionDecision::Reject(reason) => {
                    println!("reject: {}", reason);
                }
            }
        }
        Commands::Status { url, json } => {
            let res = reqwest::get(format!("{}/status", url)).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: interceptor returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }

            let report: SystemStatus = res.json().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!("version:    {}", report.version);
            println!("marker:     {}", report.marker);
            println!("master url: {}", report.master_url);
            for p in report.playlists {
                let tag = if p.master { " (master)" } else { "" };
                println!("  {:<12} {} [{} bytes]{}", p.name, p.url, p.bytes, tag);
            }
        }
    }

    Ok(())
}
