//! Headless newsfeed client.
//!
//! Renders the list and detail views as plain text so the core can be driven
//! without a UI shell.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use newsfeed_core::db::open_db;
use newsfeed_core::{
    default_log_level, init_logging, Article, ArticleFeed, ArticleId, ArticleSynchronizer,
    HttpNewsSource, NewsConfig, NewsViewModel, SqliteArticleRepository, UiState,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const REFRESH_SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "newsfeed", version, about = "Read and edit cached news articles")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Article cache database, overriding the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh from the news endpoint and print the list.
    Refresh,
    /// Print the cached list without touching the network.
    List,
    /// Print one article.
    Show { id: ArticleId },
    /// Replace one article's body text.
    Edit {
        id: ArticleId,
        #[arg(long)]
        content: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = NewsConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open cache `{}`", config.db_path.display()))?;
    let source = HttpNewsSource::from_config(&config)?;
    let feed: Arc<dyn ArticleFeed> = Arc::new(ArticleSynchronizer::new(
        SqliteArticleRepository::new(conn),
        source,
    )?);
    let view_model = NewsViewModel::new(Arc::clone(&feed));
    info!("event=cli_command module=cli status=start command={:?}", cli.command);

    let result = run(feed.as_ref(), &view_model, cli.command).await;
    view_model.shutdown().await;
    result
}

async fn run(feed: &dyn ArticleFeed, view_model: &NewsViewModel, command: Command) -> Result<()> {
    match command {
        Command::Refresh => {
            view_model.refresh().await?;
            print_list(&settled_state(view_model, REFRESH_SETTLE_TIMEOUT).await?);
        }
        Command::List => {
            // An empty cache keeps the view in `Loading`.
            let articles = feed.observe_articles().borrow().clone();
            if articles.is_empty() {
                print_list(&UiState::Loading);
            } else {
                print_list(&UiState::Success(articles));
            }
        }
        Command::Show { id } => match view_model.get_article(id).await? {
            Some(article) => print_detail(&article),
            None => println!("Article not found"),
        },
        Command::Edit { id, content } => {
            let Some(article) = view_model.get_article(id).await? else {
                bail!("article {id} not found");
            };
            view_model.update_article(article.with_content(content)).await?;
            match view_model.get_article(id).await? {
                Some(updated) => print_detail(&updated),
                None => bail!("article {id} disappeared after update"),
            }
        }
    }
    Ok(())
}

/// Waits until the state leaves `Loading`.
async fn settled_state(view_model: &NewsViewModel, limit: Duration) -> Result<UiState> {
    let mut states = view_model.subscribe();
    let state = tokio::time::timeout(
        limit,
        states.wait_for(|state| *state != UiState::Loading),
    )
    .await
    .context("timed out waiting for articles")??
    .clone();
    Ok(state)
}

fn print_list(state: &UiState) {
    match state {
        UiState::Loading => println!("No cached articles; run `newsfeed refresh`"),
        UiState::Empty => println!("No articles found"),
        UiState::Error(message) => println!("Error: {message}"),
        UiState::Success(articles) => {
            for article in articles {
                match &article.author {
                    Some(author) => println!("{:>4}  {}  (by {author})", article.id, article.title),
                    None => println!("{:>4}  {}", article.id, article.title),
                }
            }
        }
    }
}

fn print_detail(article: &Article) {
    println!("Title: {}", article.title);
    if let Some(author) = &article.author {
        println!("Author: {author}");
    }
    if let Some(image_url) = article.image_url.as_deref().filter(|url| !url.trim().is_empty()) {
        println!("Image: {image_url}");
    }
    println!();
    println!("{}", article.content.as_deref().unwrap_or_default());
}
