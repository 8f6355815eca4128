use clap::{Parser, Subcommand};
use serde_json::Value;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gamepass-cli")]
#[command(about = "Query a running gamepass-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GAMEPASS_PROXY_URL", default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is up
    Health,
    /// Aggregate gamepasses for a numeric user id
    User { user_id: String },
    /// Aggregate gamepasses for a username
    Username { username: String },
    /// List a user's games by username
    Games { username: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let path = match &cli.command {
        Commands::Health => "/health".to_string(),
        Commands::User { user_id } => format!("/gamepasses/{user_id}"),
        Commands::Username { username } => format!("/gamepasses/username/{username}"),
        Commands::Games { username } => format!("/games/username/{username}"),
    };

    let res = client.get(format!("{base}{path}")).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(ExitCode::FAILURE);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}
