//! `rawfetch <URL>...` – fetch every URL and save the 200 bodies.

use anyhow::{Context, Result};
use rawfetch_core::config::RawfetchConfig;
use rawfetch_core::driver::{self, RunEvent, RunSummary};
use rawfetch_core::processor::NoopProcessor;

/// Console lines for one run event.
pub(crate) fn event_lines(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::Fetched { url, status } => vec![format!("Fetching: {} | Status: {}", url, status)],
        RunEvent::HttpFailed { url, status } => vec![
            format!("Fetching: {} | Status: {}", url, status),
            format!("Failed to fetch content from {}, Status: {}", url, status),
        ],
        RunEvent::TransportFailed { url, error } => {
            vec![format!("Error fetching {}: {}", url, error)]
        }
        RunEvent::Stored(artifact) => vec![format!(
            "Raw HTML content saved to: {}",
            artifact.file_path.display()
        )],
        RunEvent::StorageFailed { url, path, detail } => vec![format!(
            "Error storing content from {} to {}: {}",
            url,
            path.display(),
            detail
        )],
        RunEvent::ProcessFailed { url, detail } => {
            vec![format!("Error processing content from {}: {}", url, detail)]
        }
    }
}

pub(crate) fn summary_line(summary: &RunSummary) -> String {
    let mut line = format!(
        "Done: {} of {} URL(s) saved ({} HTTP failure(s), {} transport failure(s), {} storage failure(s))",
        summary.stored,
        summary.requested,
        summary.http_failures,
        summary.transport_failures,
        summary.storage_failures
    );
    if let Some(ref e) = summary.loop_error {
        line.push_str(&format!("; fetch loop stopped early: {}", e));
    }
    line
}

pub async fn run_fetch(urls: Vec<String>, cfg: RawfetchConfig) -> Result<RunSummary> {
    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel::<RunEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            for line in event_lines(&event) {
                println!("{}", line);
            }
        }
    });

    // The sender moves into the blocking task, so the printer ends with it.
    let result = tokio::task::spawn_blocking(move || {
        driver::run(&urls, &cfg, &mut NoopProcessor, Some(&events_tx))
    })
    .await;
    // Flush queued lines before any error propagates.
    let _ = printer.await;
    let summary = result.context("fetch task join")??;

    println!("{}", summary_line(&summary));
    tracing::info!("run completed: {} stored of {}", summary.stored, summary.requested);
    Ok(summary)
}
