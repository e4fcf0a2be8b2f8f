//! sharefetch - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sharefetch::{
    cli::Args,
    config::{validate_config, Config},
    crawl::Crawler,
    download::Downloader,
    error::{Error, Result},
    output::{
        print_banner, print_catalog, print_config_summary, print_error, print_info,
        print_run_summary, print_warning, RunLog,
    },
    session::{ChromeSession, PageSession},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let share_url = config.share_url()?.to_string();
    print_config_summary(
        &share_url,
        &config.options.output_directory.display().to_string(),
        config.options.headless,
    );

    // Set up the output directory and the per-run transition log
    let out_dir = config.options.output_directory.clone();
    sharefetch::fs::ensure_dir(&out_dir)?;
    let run_log = RunLog::create(&out_dir)?;
    if let Some(path) = run_log.path() {
        print_info(&format!("Transition log: {}", path.display()));
    }

    // Launch the browser session
    print_info("Launching browser...");
    let session = ChromeSession::launch(config.options.headless).await?;
    session.allow_downloads_to(&out_dir).await?;

    let result = run_phases(&session, &config, &run_log, &share_url).await;

    // Tear the session down even when a phase failed.
    if let Err(e) = session.close().await {
        tracing::debug!("browser shutdown reported: {e}");
    }

    result
}

/// Crawl, then download; both phases share the one browser session and
/// never overlap.
async fn run_phases(
    session: &ChromeSession,
    config: &Config,
    run_log: &RunLog,
    share_url: &str,
) -> Result<()> {
    print_info("Crawling the listing...");
    let report = Crawler::new(session, config, run_log).run(share_url).await?;
    print_info(&format!(
        "Found {} file(s) across {} page(s).",
        report.catalog.len(),
        report.pages
    ));

    if report.catalog.is_empty() {
        print_warning("The listing rendered but exposed no downloadable files.");
    }

    if config.options.list_items || config.options.list_only {
        print_catalog(&report.catalog);
    }

    if config.options.list_only {
        run_log.event("list-only run: skipping downloads");
        return Ok(());
    }

    let summary = Downloader::new(session, config, run_log).run(&report.catalog).await?;
    print_run_summary(&summary);
    run_log.event(&format!(
        "run finished: total {} downloaded {} skipped {} failed {}",
        summary.total,
        summary.succeeded,
        summary.skipped,
        summary.failed_count()
    ));

    // Partial results were already reported above; the abort still makes
    // the whole run a failure.
    if let Some(reason) = summary.aborted {
        return Err(Error::Session(reason));
    }

    Ok(())
}
