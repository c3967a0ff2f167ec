use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use tokio::sync::Semaphore;
use tracing::debug;

use client::{
    BlockingRecommendationsClient, ClientConfig, ClientError, RecommendationsClient, DEFAULT_ADDR,
};
use schema::{BookRecommendation, Category, RecommendationRequest};

/// Bookworm - command line client for the recommendations service
#[derive(Parser)]
#[command(name = "bookworm")]
#[command(about = "Query and exercise the Bookworm recommendations service", long_about = None)]
struct Cli {
    /// Recommendations service address
    #[arg(long, global = true, env = "RECOMMENDATIONS_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Per-call deadline in milliseconds
    #[arg(long, global = true, env = "RECOMMENDATIONS_TIMEOUT_MS", default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get book recommendations for one category
    Recommend {
        /// mystery, science-fiction or self-help
        #[arg(long)]
        category: Category,

        /// Maximum number of books; the server default applies when omitted
        #[arg(long)]
        max_results: Option<u32>,

        #[arg(long, default_value = "1")]
        user_id: u32,
    },

    /// Fire concurrent calls and check every answer belongs to its request
    Bench {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(cli.addr).with_request_timeout(Duration::from_millis(cli.timeout_ms));

    match cli.command {
        Commands::Recommend {
            category,
            max_results,
            user_id,
        } => handle_recommend(config, user_id, category, max_results),
        Commands::Bench {
            requests,
            concurrent,
        } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Building tokio runtime")?;
            runtime.block_on(handle_bench(config, requests, concurrent))
        }
    }
}

/// Handle the 'recommend' command
fn handle_recommend(
    config: ClientConfig,
    user_id: u32,
    category: Category,
    max_results: Option<u32>,
) -> Result<()> {
    let client = BlockingRecommendationsClient::connect(config)?;

    let request = RecommendationRequest {
        user_id,
        category: category.into(),
        max_results,
    };
    match client.recommend(request) {
        Ok(response) => {
            print_recommendations(category, &response.recommendations);
            Ok(())
        }
        Err(e @ ClientError::InvalidArgument(_)) => bail!("request rejected: {e}"),
        Err(e) => Err(e).context("calling recommendations service"),
    }
}

/// Handle the 'bench' command
async fn handle_bench(config: ClientConfig, requests: usize, concurrent: usize) -> Result<()> {
    if concurrent == 0 {
        bail!("--concurrent must be at least 1");
    }
    let client = RecommendationsClient::connect(config).await?;

    // Full category contents, used to check that no answer leaks across calls.
    let mut reference: HashMap<Category, HashSet<u32>> = HashMap::new();
    for category in Category::ALL {
        let response = client
            .recommend(RecommendationRequest::new(0, category, u32::MAX))
            .await
            .with_context(|| format!("fetching reference list for {category}"))?;
        reference.insert(category, response.recommendations.iter().map(|b| b.id).collect());
    }
    let reference = Arc::new(reference);

    let plan: Vec<RecommendationRequest> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|i| {
                let category = *Category::ALL.choose(&mut rng).unwrap_or(&Category::Mystery);
                RecommendationRequest::new(i as u32, category, rand::random_range(0..=4))
            })
            .collect()
    };

    let permits = Arc::new(Semaphore::new(concurrent));
    let started = Instant::now();
    let mut handles = Vec::with_capacity(plan.len());
    for request in plan {
        let client = client.clone();
        let permits = permits.clone();
        let reference = reference.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            let response = client.recommend(request.clone()).await?;
            let elapsed = start.elapsed();
            check_response(&request, &response.recommendations, &reference)?;
            Ok::<_, anyhow::Error>(elapsed)
        }));
    }

    let mut timings = vec![];
    let mut failures = 0usize;
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(e) => {
                failures += 1;
                println!("{} {:#}", "✗".red(), e);
            }
        }
    }
    let wall_time = started.elapsed();

    if timings.is_empty() {
        bail!("all {} requests failed", requests);
    }

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ok, {} failed", timings.len(), failures);
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    if failures > 0 {
        bail!("{} of {} requests failed", failures, requests);
    }
    Ok(())
}

/// Every book must come from the requested category, without repeats, and
/// the count must be `min(max_results, category size)`.
fn check_response(
    request: &RecommendationRequest,
    books: &[BookRecommendation],
    reference: &HashMap<Category, HashSet<u32>>,
) -> Result<()> {
    let category = request.category()?;
    let allowed = reference.get(&category).cloned().unwrap_or_default();
    let expected = (request.effective_max_results() as usize).min(allowed.len());

    let ids: HashSet<u32> = books.iter().map(|b| b.id).collect();
    if books.len() != expected || ids.len() != books.len() {
        bail!(
            "user {}: expected {} distinct {} books, got {}",
            request.user_id,
            expected,
            category,
            books.len()
        );
    }
    if !ids.is_subset(&allowed) {
        bail!("user {}: answer contains books outside {}", request.user_id, category);
    }
    debug!(user_id = request.user_id, %category, count = books.len(), "response checked");
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(category: Category, books: &[BookRecommendation]) {
    println!("{}", format!("{} recommendations:", category.label()).bold().blue());
    if books.is_empty() {
        println!("  (none)");
    }
    for (i, book) in books.iter().enumerate() {
        let rank = (i + 1).to_string();
        if book.author.is_empty() {
            println!("{}. {} [#{}]", rank.green(), book.title, book.id);
        } else {
            println!("{}. {} by {} [#{}]", rank.green(), book.title, book.author, book.id);
        }
    }
}
