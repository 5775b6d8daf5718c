use clap::{Parser, Subcommand};
use serde::Serialize;
use user_service_client::client::UserFields;
use user_service_client::UserClient;

#[derive(Parser)]
#[command(name = "user-cli")]
#[command(about = "Management CLI for the user service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Check service readiness
    Ready,
    /// List all users
    List,
    /// Show one user
    Get { id: u64 },
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Update fields of a user
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a user
    Delete { id: u64 },
    /// Dump Prometheus metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = UserClient::new(&cli.url);

    match cli.command {
        Commands::Health => {
            let status = client.health().await?;
            println!("{} ({})", status.status, status.service.unwrap_or_default());
        }
        Commands::Ready => println!("{}", client.ready().await?.status),
        Commands::List => print_json(&client.list().await?.users)?,
        Commands::Get { id } => print_json(&client.get(id).await?)?,
        Commands::Create { name, email, role } => {
            let fields = UserFields {
                name: Some(name),
                email: Some(email),
                role,
            };
            print_json(&client.create(&fields).await?)?;
        }
        Commands::Update {
            id,
            name,
            email,
            role,
        } => {
            let fields = UserFields { name, email, role };
            print_json(&client.update(id, &fields).await?)?;
        }
        Commands::Delete { id } => println!("{}", client.delete(id).await?),
        Commands::Metrics => print!("{}", client.metrics().await?),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
