//! Demo that runs one full submission against a live ingestion service and
//! then prints the current critical-zones window.
//!
//! Usage: `field_demo <image-path> [source] [location text]`

use std::sync::Arc;

use anyhow::{Context, Result};
use fieldlink::config::ClientConfig;
use fieldlink::{
    HttpIngestClient, IngestClient, LocationResolver, NewReport, NominatimClient, RankedWindow,
    ReportSource, StatusTicker, UploadOrchestrator, DEFAULT_ROTATION_PERIOD,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let image_path = args
        .next()
        .context("usage: field_demo <image-path> [source] [location text]")?;
    let source = match args.next() {
        Some(token) => token
            .parse::<ReportSource>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => ReportSource::Citizen,
    };
    let location_text = args.next();

    let cfg = ClientConfig::from_env();
    let ingest = Arc::new(HttpIngestClient::new(&cfg.api_url));
    let resolver = LocationResolver::new(Arc::new(NominatimClient::new(&cfg.geocode_url)));
    let orchestrator = UploadOrchestrator::new(ingest.clone(), resolver)
        .with_max_image_dim(cfg.max_image_dim);

    let image_bytes = tokio::fs::read(&image_path)
        .await
        .with_context(|| format!("reading {image_path}"))?;

    // Cosmetic progress line while the upstream analysis runs.
    let ticker = StatusTicker::start(DEFAULT_ROTATION_PERIOD);
    let mut rx = ticker.subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let msg = *rx.borrow();
            println!("  {msg}");
        }
    });

    let outcome = orchestrator
        .submit(NewReport {
            image_bytes,
            source,
            location_text,
            device_fix: None,
        })
        .await;
    ticker.stop();
    let _ = printer.await;

    match outcome {
        Ok(report) => println!(
            "submitted report #{} — severity {:?}, priority {}",
            report.id, report.severity, report.priority_score
        ),
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }

    let reports = ingest.list_reports().await?;
    let window = RankedWindow::from_snapshot(&reports, cfg.priority_threshold, cfg.window_size);
    if window.is_empty() {
        println!("no critical zones currently detected");
    } else {
        println!(
            "critical zones (top {} of {}): {:?}",
            window.visible().len(),
            window.ordered_ids().len(),
            window.visible()
        );
    }

    Ok(())
}
