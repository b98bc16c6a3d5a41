use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tabstash::app::AppContext;
use tabstash::cli::{commands, Cli, Commands};
use tabstash::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { url } => {
            commands::extract_article(&config, &url).await?;
        }
        Commands::Serve { bind } => {
            commands::serve(&config, bind.as_deref()).await?;
        }
        Commands::Save {
            url,
            title,
            tags,
            no_extract,
        } => {
            let ctx = AppContext::new(config, cli.db)?;
            commands::save_bookmark(&ctx, &url, title, tags, no_extract).await?;
        }
        Commands::List => {
            let ctx = AppContext::new(config, cli.db)?;
            commands::list_bookmarks(&ctx)?;
        }
        Commands::Search { query } => {
            let ctx = AppContext::new(config, cli.db)?;
            commands::search_bookmarks(&ctx, &query)?;
        }
        Commands::Delete { index } => {
            let ctx = AppContext::new(config, cli.db)?;
            commands::delete_bookmark(&ctx, index)?;
        }
        Commands::Sync => {
            let ctx = AppContext::new(config, cli.db)?;
            commands::sync_bookmarks(&ctx).await?;
        }
    }

    Ok(())
}
