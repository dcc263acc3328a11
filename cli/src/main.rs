use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use api::OwnershipMode;
use commands::{check, health, serve};

/// Taskboard - project and task management server with role-based access control
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 5000)]
        port: u16,

        /// Origin allowed to call the API with credentials
        #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
        frontend_url: String,

        /// How resource ownership is resolved (index, containment)
        #[arg(long, env = "OWNERSHIP_MODE", default_value = "index")]
        ownership: OwnershipMode,

        /// Start with an empty store instead of the demo data
        #[arg(long)]
        no_seed: bool,

        /// Also write daily log files to this directory
        #[arg(long, env = "LOG_DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Evaluate one authorization decision
    Check {
        /// Caller role (SUPER_ADMIN, TEAM_LEAD, TEAM_MEMBER, EXTERNAL_PARTNER)
        #[arg(long)]
        role: String,

        /// Requested action (READ, WRITE, DELETE, ADMIN)
        #[arg(long)]
        action: String,

        /// Target resource id
        #[arg(long)]
        resource: String,

        /// Caller id
        #[arg(long)]
        caller: String,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Query a running server's health endpoint
    Health {
        /// Base URL of the server
        #[arg(long, env = "TASKBOARD_URL", default_value = "http://localhost:5000")]
        url: String,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            frontend_url,
            ownership,
            no_seed,
            log_dir,
        } => {
            let _guard = logging::init_server_logging(log_dir.as_deref(), cli.verbose)?;
            let config = api::ApiConfig::new()
                .with_host(host)
                .with_port(port)
                .with_frontend_url(frontend_url)
                .with_ownership(ownership)
                .with_seed_data(!no_seed);
            serve::execute(config).await?;
            logging::log_shutdown();
        }
        Commands::Check {
            role,
            action,
            resource,
            caller,
            format,
        } => {
            logging::init_console_logging(cli.verbose);
            check::execute(&role, &action, &resource, &caller, &format)?;
        }
        Commands::Health { url, format } => {
            logging::init_console_logging(cli.verbose);
            health::execute(&url, &format).await?;
        }
    }

    Ok(())
}
