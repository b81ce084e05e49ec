use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::crawler::Crawler;
use engine::fetch::HttpFetcher;
use engine::html::ScraperExtractor;
use engine::report::write_crawl_report;
use engine::store::Store;
use engine::tokenizer::StopWords;
use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "crawler")]
#[command(about = "Crawl pages breadth-first into the persistent index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl from a seed URL and commit the session
    Crawl {
        /// Seed URL to start from
        #[arg(long)]
        seed: String,
        /// Maximum pages to index this session
        #[arg(long, default_value_t = 300)]
        max_pages: usize,
        /// Index database directory
        #[arg(long, default_value = "./spider_db")]
        db: String,
        /// Stop word file, one word per line
        #[arg(long, default_value = "./stopwords.txt")]
        stopwords: String,
        /// Also write the crawl report to this path
        #[arg(long)]
        report: Option<String>,
    },
    /// Write the crawl report for an existing index
    Report {
        /// Index database directory
        #[arg(long, default_value = "./spider_db")]
        db: String,
        /// Output file path
        #[arg(long, default_value = "./spider_result.txt")]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seed,
            max_pages,
            db,
            stopwords,
            report,
        } => {
            let store = Store::open(&db)?;
            let stopwords = StopWords::load(&stopwords);
            if stopwords.is_empty() {
                tracing::warn!("stop word set is empty");
            }
            let fetcher = HttpFetcher::new()?;
            let extractor = ScraperExtractor;
            let crawler = Crawler::new(&fetcher, &extractor, &store, &stopwords);
            let summary = crawler.crawl(&seed, max_pages)?;
            tracing::info!(
                indexed = summary.indexed,
                skipped = summary.skipped,
                frontier_left = summary.frontier_left,
                "crawl committed"
            );
            if let Some(path) = report {
                let out = BufWriter::new(File::create(&path)?);
                write_crawl_report(&store, &fetcher, out)?;
                tracing::info!(%path, "crawl report written");
            }
        }
        Commands::Report { db, output } => {
            let store = Store::open(&db)?;
            let fetcher = HttpFetcher::new()?;
            let out = BufWriter::new(File::create(&output)?);
            write_crawl_report(&store, &fetcher, out)?;
            tracing::info!(path = %output, "crawl report written");
        }
    }
    Ok(())
}
