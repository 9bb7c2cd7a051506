//! Quiz generator CLI
//!
//! Generates quizzes from article URLs and browses the stored history.

mod config;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use quizgen::{
    ContentExtractor, GenerationClient, HttpFetcher, ListQuery, OpenAIBackend, QuizPipeline,
    QuizRecord, QuizStore, SqliteStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "quizgen", version, about = "Generate quizzes from articles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate (or fetch the stored) quiz for an article URL
    Generate {
        url: String,

        /// Number of questions to generate
        #[arg(short, long)]
        questions: Option<usize>,
    },
    /// List stored quizzes, newest first
    History {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Case-insensitive match on title or URL
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one stored quiz
    Show { id: i64 },
    /// Delete one stored quiz
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quizgen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = SqliteStore::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;

    match cli.command {
        Command::Generate { url, questions } => generate(&config, store, &url, questions).await,
        Command::History {
            page,
            limit,
            search,
        } => history(&store, page, limit, search).await,
        Command::Show { id } => {
            let record = store
                .find_by_id(id)
                .await
                .context("Failed to load quiz")?
                .ok_or_else(|| anyhow!("No quiz with id {id}"))?;
            print_record(&record)
        }
        Command::Delete { id } => {
            if !store.delete(id).await.context("Failed to delete quiz")? {
                bail!("No quiz with id {id}");
            }
            println!("Deleted quiz {id}");
            Ok(())
        }
    }
}

async fn generate(
    config: &Config,
    store: SqliteStore,
    url: &str,
    questions: Option<usize>,
) -> Result<()> {
    let backend = OpenAIBackend::new(config.require_api_key()?.clone())
        .with_base_url(config.openai_base_url.clone())
        .with_model(config.llm_model.clone())
        .with_temperature(config.llm_temperature)
        .with_timeout(config.llm_timeout);

    let pipeline = QuizPipeline::new(
        ContentExtractor::new(HttpFetcher::new()).with_config(config.extractor_config()),
        GenerationClient::new(backend),
        store,
    )
    .with_config(config.pipeline_config());

    let outcome = match questions {
        Some(count) => pipeline.run(url, count).await,
        None => pipeline.run_default(url).await,
    }
    .map_err(|e| anyhow!("[{}] {}", e.code(), e))?;

    if !outcome.is_generated() {
        tracing::info!(id = outcome.record().id, "Quiz already stored for this URL");
    }
    print_record(outcome.record())
}

async fn history(
    store: &SqliteStore,
    page: usize,
    limit: usize,
    search: Option<String>,
) -> Result<()> {
    let mut query = ListQuery::new(page, limit);
    if let Some(search) = search {
        query = query.with_search(search);
    }

    let page = store.list(&query).await.context("Failed to list quizzes")?;
    for record in &page.records {
        println!(
            "{:>5}  {}  {:>2}q  {}  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.question_count(),
            record.title(),
            record.url()
        );
    }
    println!(
        "page {}/{} ({} total)",
        page.page,
        page.total_pages().max(1),
        page.total
    );
    Ok(())
}

fn print_record(record: &QuizRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("Failed to serialize quiz")?;
    println!("{json}");
    Ok(())
}
