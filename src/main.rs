mod client;
mod filing;
mod filing_id;
mod headline;
mod links;
mod listing;
mod normalize;
mod output;
mod page;
mod resolve;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Parser)]
#[command(name = "bse_scraper", about = "BSE corporate announcement fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the day's announcements, resolve categories + PDF links, write CSV
    Fetch {
        /// Date to fetch, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Max announcements to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output CSV path (default: bse_announcements_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve a single announcement id and print the outcome
    Resolve {
        /// Announcement NEWSID
        news_id: String,
        /// Headline text, used for the last-resort subcategory fallback
        #[arg(long, default_value = "")]
        headline: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch { date, limit, output } => run_fetch(date, limit, output).await,
        Commands::Resolve { news_id, headline } => run_resolve(&news_id, &headline).await,
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_fetch(
    date: Option<NaiveDate>,
    limit: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let client = client::BseClient::new()?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    info!("Fetching BSE announcements for {}", date);
    let mut announcements = listing::fetch_announcements(&client, date).await?;
    if let Some(n) = limit {
        announcements.truncate(n);
    }
    if announcements.is_empty() {
        println!("No announcements found for {}.", date);
        return Ok(());
    }
    println!("Resolving {} announcements...", announcements.len());

    let pb = ProgressBar::new(announcements.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut rows = Vec::with_capacity(announcements.len());
    for ann in &announcements {
        let resolved = resolve::resolve(&client, ann.id(), &ann.headline()).await;
        rows.push(output::OutputRow {
            stock_code: ann.stock_code(),
            stock_name: ann.stock_name(),
            headline: ann.headline(),
            category: resolved.category,
            subcategory: resolved.subcategory,
            pdf_link: resolved.doc_link,
            date: ann.date_field(),
            news_id: ann.id().to_string(),
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("bse_announcements_{}.csv", date.format("%Y%m%d")))
    });
    output::write_rows(&path, &rows)?;
    info!("Saved {} announcements to {}", rows.len(), path.display());
    println!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

async fn run_resolve(news_id: &str, headline: &str) -> Result<()> {
    let client = client::BseClient::new()?;
    let resolved = resolve::resolve(&client, news_id, headline).await;

    println!("Category:    {}", resolved.category);
    println!("Subcategory: {}", resolved.subcategory);
    println!(
        "PDF link:    {}",
        if resolved.doc_link.is_empty() {
            "-"
        } else {
            &resolved.doc_link
        }
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
