use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use goodreads_tsv::{
    cli::Cli,
    info_time,
    process::{export_reviews, DATE_READ_ADVISORY},
};

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Local::now();
    let config = Cli::parse().into_config();

    let summary = match export_reviews(&config).await {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(page) = e.failed_page() {
                println!("Error downloading data: {e}");
                println!("Page {page} could not be fetched. This might be due to:");
                println!("1. Invalid user ID");
                println!("2. Profile is private");
                println!("3. Missing or invalid cookies");
            } else {
                println!("Error: {e}");
            }
            println!("Failed to process Goodreads data.");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Successfully processed {} pages of Goodreads data.",
        summary.pages
    );
    println!("Data successfully written to {}", config.output.display());
    if summary.needs_date_read_advisory() {
        println!("\n{DATE_READ_ADVISORY}");
    }
    info_time!(start_time, "Full program time:");

    ExitCode::SUCCESS
}
