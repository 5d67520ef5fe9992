use clap::Parser;
use dialoguer::Input;
use scragle::{HarvestConfig, HarvestReport, Result, ScrapeError};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging; progress is reported at info level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(args).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => ::log::error!("Failed to serialize report: {}", e),
        },
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<HarvestReport> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    }
    .with_env_overrides();
    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(dir) = &args.images_dir {
        config.images_dir = dir.clone();
    }

    // The session is complete before any browser is started
    let session = args.session(&config.images_dir, prompt_line)?;

    ::log::info!(
        "Harvesting up to {} image(s) from {}",
        session.count(),
        session.url()
    );
    let report = match &args.snapshot {
        Some(path) => scragle::harvest_snapshot(&session, &config, path).await?,
        None => {
            println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using the default {}",
                config.webdriver_url
            );
            scragle::harvest(&session, &config).await?
        }
    };

    ::log::info!(
        "Saved {} of {} requested image(s), skipped {}",
        report.written.len(),
        report.requested,
        report.skipped
    );
    if report.is_short() {
        ::log::warn!("The page ran out of usable results before the requested count");
    }
    Ok(report)
}

/// Ask for a non-empty value on the terminal
fn prompt_line(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Please provide a valid value.")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map(|value| value.trim().to_string())
        .map_err(|e| ScrapeError::InvalidInput(format!("could not read {}: {}", prompt, e)))
}

fn report_error(err: &ScrapeError) {
    ::log::error!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        ::log::error!("  caused by: {}", cause);
        source = cause.source();
    }
}
