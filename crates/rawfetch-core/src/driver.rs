//! Run orchestration: fetch every URL over one shared client, persist each
//! 200 body as soon as its request completes, then hand it to the processor.
//!
//! Per-URL failures (HTTP status, transport, storage, processor) are logged,
//! reported as events and counted; none of them stops the run.

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::RawfetchConfig;
use crate::fetcher::{fetch_all, FetchClient, FetchOptions, FetchOutcome, TransportError};
use crate::processor::BodyProcessor;
use crate::storage::{persist_with, StoredArtifact};

/// Progress notifications, sent in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Request finished with status 200.
    Fetched { url: String, status: u16 },
    HttpFailed { url: String, status: u16 },
    TransportFailed { url: String, error: TransportError },
    Stored(StoredArtifact),
    StorageFailed { url: String, path: PathBuf, detail: String },
    ProcessFailed { url: String, detail: String },
}

/// Counts for one run. Every requested URL lands in exactly one of
/// `fetched`, `http_failures` or `transport_failures`; every fetched URL in
/// exactly one of `stored` or `storage_failures`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: usize,
    pub fetched: usize,
    pub http_failures: usize,
    pub transport_failures: usize,
    pub stored: usize,
    pub storage_failures: usize,
    pub process_failures: usize,
    pub artifacts: Vec<StoredArtifact>,
    /// Set when the event loop broke early. Remaining URLs were already
    /// reported as transport failures, so the run is still complete.
    pub loop_error: Option<String>,
}

impl RunSummary {
    /// Number of URLs that reached a terminal fetch state.
    pub fn completed(&self) -> usize {
        self.fetched + self.http_failures + self.transport_failures
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no URLs given")]
    NoUrls,
}

fn emit(events: Option<&UnboundedSender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// Fetch and persist every URL in `urls` according to `cfg`.
///
/// Blocks until every request is terminal; call from `spawn_blocking` in
/// async code. The client lives for this call only.
pub fn run<P>(
    urls: &[String],
    cfg: &RawfetchConfig,
    processor: &mut P,
    events: Option<&UnboundedSender<RunEvent>>,
) -> Result<RunSummary, RunError>
where
    P: BodyProcessor + ?Sized,
{
    if urls.is_empty() {
        return Err(RunError::NoUrls);
    }

    let client = FetchClient::new(FetchOptions::from(cfg));
    let mut summary = RunSummary {
        requested: urls.len(),
        ..RunSummary::default()
    };
    tracing::info!(
        urls = urls.len(),
        max_concurrent = ?cfg.max_concurrent,
        output_dir = %cfg.output_dir.display(),
        "run started"
    );

    let result = fetch_all(&client, urls, cfg.max_concurrent, |_, outcome| {
        handle_outcome(outcome, cfg, processor, events, &mut summary);
    });
    drop(client);
    record_loop_result(&mut summary, result);

    tracing::info!(
        fetched = summary.fetched,
        http_failures = summary.http_failures,
        transport_failures = summary.transport_failures,
        stored = summary.stored,
        storage_failures = summary.storage_failures,
        "run finished"
    );
    Ok(summary)
}

fn record_loop_result(summary: &mut RunSummary, result: Result<(), curl::MultiError>) {
    if let Err(e) = result {
        tracing::error!(
            error = %e,
            completed = summary.completed(),
            requested = summary.requested,
            "fetch loop failed; remaining URLs reported as transport failures"
        );
        summary.loop_error = Some(e.to_string());
    }
}

fn handle_outcome<P>(
    outcome: FetchOutcome,
    cfg: &RawfetchConfig,
    processor: &mut P,
    events: Option<&UnboundedSender<RunEvent>>,
    summary: &mut RunSummary,
) where
    P: BodyProcessor + ?Sized,
{
    match outcome {
        FetchOutcome::Success { url, body, status } => {
            summary.fetched += 1;
            tracing::info!(url = %url, status, bytes = body.len(), "fetched");
            emit(events, RunEvent::Fetched { url: url.clone(), status });

            match persist_with(&cfg.output_dir, &url, &body, cfg.naming) {
                Ok(artifact) => {
                    summary.stored += 1;
                    emit(events, RunEvent::Stored(artifact.clone()));
                    if let Err(e) = processor.process(&artifact, &body) {
                        summary.process_failures += 1;
                        tracing::warn!(url = %url, error = %format!("{:#}", e), "processor failed");
                        emit(
                            events,
                            RunEvent::ProcessFailed {
                                url,
                                detail: format!("{:#}", e),
                            },
                        );
                    }
                    summary.artifacts.push(artifact);
                }
                Err(e) => {
                    summary.storage_failures += 1;
                    tracing::warn!(url = %url, path = %e.path.display(), error = %e.source, "storage failed");
                    emit(
                        events,
                        RunEvent::StorageFailed {
                            url,
                            path: e.path.clone(),
                            detail: e.source.to_string(),
                        },
                    );
                }
            }
        }
        FetchOutcome::HttpFailure { url, status } => {
            summary.http_failures += 1;
            tracing::warn!(url = %url, status, "non-200 response, body discarded");
            emit(events, RunEvent::HttpFailed { url, status });
        }
        FetchOutcome::TransportFailure { url, error } => {
            summary.transport_failures += 1;
            tracing::warn!(url = %url, kind = ?error.kind, error = %error, "transport failure");
            emit(events, RunEvent::TransportFailed { url, error });
        }
    }
}
