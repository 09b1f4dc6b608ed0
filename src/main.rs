//! CLI entry point for tensorlab

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tensorlab")]
#[command(version)]
#[command(about = "Content server for the TensorLab site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug (file name) of the new post, derived from the title by default
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Start the server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List site information
    List {
        /// Type of content to list (post, event)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "tensorlab=debug,info"
    } else {
        "tensorlab=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            tensorlab::commands::init::init_site(&target_dir)?;
            println!("Initialized TensorLab site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = tensorlab::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = tensorlab::commands::new::create_post(&site, &title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Server { port, ip, open } => {
            let site = tensorlab::Site::new(&base_dir)?;
            tracing::info!(
                "Serving {} posts from {:?}",
                site.repository().list_slugs()?.len(),
                site.content_dir
            );
            tensorlab::server::start(&site, &ip, port, open).await?;
        }

        Commands::List { r#type } => {
            let site = tensorlab::Site::new(&base_dir)?;
            tensorlab::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("tensorlab version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
