use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use internet3_proxy::config::RewriteConfig;
use internet3_proxy::{RewriteContext, RewritePipeline};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Client and offline tooling for the Internet 3.0 proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy status
    Status,
    /// Fetch a page through the running proxy and print it
    Fetch {
        /// Absolute URL of the page
        target: String,
    },
    /// Rewrite a local HTML file as if it had been fetched from BASE
    Rewrite {
        /// HTML file to rewrite
        file: PathBuf,
        /// URL the document is treated as coming from
        #[arg(short, long)]
        base: String,
        /// Proxy endpoint path used in rewritten links
        #[arg(long, default_value = "/proxy")]
        proxy_path: String,
        /// Skip the banner
        #[arg(long)]
        no_banner: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let res = reqwest::get(format!("{}/api/status", cli.url)).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: proxy returned status {}", status);
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Fetch { target } => {
            let client = reqwest::Client::new();
            let res = client
                .get(format!("{}/proxy", cli.url))
                .query(&[("url", target.as_str())])
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            if !status.is_success() {
                eprintln!("Error: proxy returned status {}", status);
            }
            println!("{}", body);
        }
        Commands::Rewrite {
            file,
            base,
            proxy_path,
            no_banner,
        } => {
            let bytes = std::fs::read(&file)?;
            let ctx = RewriteContext::parse(&base)?;
            let config = RewriteConfig {
                proxy_path,
                banner_enabled: !no_banner,
                ..RewriteConfig::default()
            };
            let output = RewritePipeline::new(&config).process(&bytes, &ctx);
            println!("{}", String::from_utf8_lossy(&output));
        }
    }

    Ok(())
}
