mod assistant;
mod math;
mod openai;
mod query;
mod search;
mod spell;
mod summarize;

pub const USER_AGENT: &str = concat!("valet/", env!("CARGO_PKG_VERSION"));

use std::time::Duration;

use clap::Parser;
use tracing::debug;

use assistant::{Models, Reply, Route};
use openai::client::OpenAiClient;
use spell::SpellCheck;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(180);

/// Demo queries, run when none are given on the command line.
const DEMO_QUERIES: &[&str] = &[
    "Tell me about the impact of solar power on rural communities.",
    "25*(3+7)",
    "I want to lern about artifical inteligence",
    "Searh for informaton about quantim computing",
    "What is the lrgest planet in Soler System?",
];

/// Multi-tool assistant: spell-checks each query, then routes it to a
/// local calculator or a search-and-summarize pipeline.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Queries to run; defaults to a built-in demo set.
    queries: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("valet=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let http = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let client = OpenAiClient::from_env(http);
    let models = Models::from_env();
    debug!(spell = %models.spell, summary = %models.summary, "models selected");

    let queries: Vec<String> = if args.queries.is_empty() {
        DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        args.queries
    };

    for query in &queries {
        println!("\n{}", "=".repeat(50));
        let reply = assistant::run(&client, &models, query).await?;
        report(query, &reply);
    }

    Ok(())
}

fn report(input: &str, reply: &Reply) {
    println!("Original input: {input}");

    match &reply.spell {
        SpellCheck::Corrected(text) => {
            println!("Spelling corrections applied:");
            println!("  original:  {input}");
            println!("  corrected: {text}");
        }
        SpellCheck::Unchanged => println!("No spelling errors detected."),
        SpellCheck::ServiceFailed(reason) => {
            println!("Spell check unavailable ({reason}); using original text.");
        }
    }

    match &reply.route {
        Route::Calculator { verdict } => {
            println!("Detected math input. Routing to calculator.");
            println!("{verdict}");
        }
        Route::Pipeline {
            keywords,
            results,
            summary,
        } => {
            println!("Extracted keywords: {}", keywords.join(", "));
            println!("Search results:\n{results}");
            println!("\nSummary:\n{summary}");
        }
    }
}
