//! redirect-deployer - Firebase Hosting redirect panel
//!
//! Main entry point for the redirect-deployer CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use redirect_deployer::config::{validate_config, PanelConfig};
use redirect_deployer::server::PanelServer;
use redirect_deployer::{DeployOutcome, DeployRequest, Deployer};
use std::path::{Path, PathBuf};
use std::process;
use tokio::net::TcpListener;

/// redirect-deployer - Deploy redirect-only sites to Firebase Hosting
#[derive(Parser, Debug)]
#[command(name = "redirect-deployer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/redirect-deployer/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing one folder per Firebase project
    #[arg(short, long, env = "REDIRECT_DEPLOYER_ROOT")]
    root: Option<PathBuf>,

    /// Firebase CLI executable
    #[arg(long, env = "FIREBASE_CLI")]
    firebase_cli: Option<PathBuf>,

    /// Timeout for each firebase invocation, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web control panel (default)
    Serve {
        /// Address to listen on (e.g. 127.0.0.1:5000)
        #[arg(short, long, env = "REDIRECT_DEPLOYER_BIND")]
        bind: Option<String>,

        /// Open the panel in the default browser
        #[arg(long)]
        open: bool,
    },

    /// List projects under the projects root
    Projects,

    /// List content folders of a project
    Folders {
        /// Project folder name
        project: String,
    },

    /// Deploy a redirect site once, without the web panel
    Deploy {
        /// Project folder name
        project: String,

        /// Content folder inside the project
        folder: String,

        /// Hosting site / target name
        site_name: String,

        /// Destination URL (https:// is added when no scheme is given)
        redirect_url: String,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check the effective configuration
    Validate,
}

#[tokio::main]
async fn main() {
    if let Err(e) = redirect_deployer::logging::init("info") {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(PanelConfig::default_path);
    let mut config = PanelConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if let Some(root) = cli.root {
        config.projects_root = root;
    }
    if let Some(firebase_cli) = cli.firebase_cli {
        config.firebase_cli = firebase_cli;
    }
    if let Some(timeout) = cli.timeout {
        config.command_timeout_secs = timeout;
    }

    let command = cli.command.unwrap_or(Commands::Serve {
        bind: None,
        open: false,
    });

    match command {
        Commands::Serve { bind, open } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve(config, open).await
        }
        Commands::Projects => {
            let listing = Deployer::new(config).list_projects();
            for name in listing.names {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Folders { project } => {
            let listing = Deployer::new(config).list_folders(&project)?;
            for name in listing.names {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Deploy {
            project,
            folder,
            site_name,
            redirect_url,
        } => {
            let deployer = Deployer::new(config);
            let request = DeployRequest::new(project, folder, site_name, redirect_url);
            match deployer.deploy(request).await? {
                DeployOutcome::Deployed { message, .. } => {
                    println!("{}", message);
                    Ok(())
                }
                DeployOutcome::Failed { error, .. } => anyhow::bail!("Deploy failed: {}", error),
            }
        }
        Commands::Config(cmd) => handle_config(cmd, &config, &config_path),
    }
}

async fn serve(config: PanelConfig, open_browser: bool) -> anyhow::Result<()> {
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::warn!(%error, "Configuration problem");
        }
    }

    let cli = firebase::Firebase::new(&config.firebase_cli);
    match cli.version().await {
        Ok(version) => tracing::info!(version = %version, "Found firebase CLI"),
        Err(e) => tracing::warn!(error = %e, "Firebase CLI not available, deploys will fail"),
    }

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    let url = format!("http://{}", listener.local_addr()?);
    println!("Redirect panel running at {}", url);
    if open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, url = %url, "Failed to open browser");
        }
    }

    PanelServer::new(config).serve(listener).await?;
    Ok(())
}

fn handle_config(
    cmd: ConfigCommands,
    config: &PanelConfig,
    config_path: &Path,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(config)?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            config.save(config_path)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        }
        ConfigCommands::Validate => match validate_config(config) {
            Ok(()) => {
                println!("Configuration is valid");
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                anyhow::bail!("{} configuration problem(s)", errors.len())
            }
        },
    }
}
