//! Curl multi event loop: perform, wait, messages; classify completed handles
//! and keep up to `max_concurrent` requests in flight.

use std::collections::VecDeque;
use std::time::Duration;

use super::refill::{self, ActiveItem};
use super::{outcome, FetchClient, FetchOutcome, TransportError, TransportKind};

/// Upper bound on one `Multi::wait`; curl returns earlier on socket activity.
const WAIT_MS: u64 = 100;

/// Run every URL through the client's multi handle. `on_outcome` is called
/// exactly once per URL index, in completion order, on this thread.
///
/// On a multi-level failure every URL still in flight or pending is reported
/// as a transport failure before the error is returned.
pub(super) fn run_multi<F>(
    client: &FetchClient,
    urls: &[String],
    max_concurrent: usize,
    on_outcome: &mut F,
) -> Result<(), curl::MultiError>
where
    F: FnMut(usize, FetchOutcome),
{
    if urls.is_empty() {
        return Ok(());
    }

    let multi = &client.multi;
    let opts = &client.options;
    let mut pending: VecDeque<usize> = (0..urls.len()).collect();
    let mut active: Vec<ActiveItem> = Vec::new();

    refill::refill_active(multi, urls, opts, max_concurrent, &mut active, &mut pending, on_outcome);

    while !active.is_empty() {
        let running = match multi.perform() {
            Ok(n) => n,
            Err(e) => {
                abandon(client, urls, active, pending, &e, on_outcome);
                return Err(e);
            }
        };

        let mut completed: Vec<(usize, Result<(), curl::Error>)> = Vec::new();
        multi.messages(|msg| {
            for (i, (handle, _)) in active.iter().enumerate() {
                if let Some(res) = msg.result_for2(handle) {
                    completed.push((i, res));
                    break;
                }
            }
        });
        completed.sort_by(|a, b| b.0.cmp(&a.0));

        for (i, res) in completed {
            let (handle, index) = active.remove(i);
            let url = &urls[index];
            let result = match multi.remove2(handle) {
                Ok(mut easy) => {
                    let code = easy.response_code().unwrap_or(0);
                    outcome::outcome_from_transfer(url, res, code, easy.get_mut())
                }
                Err(e) => FetchOutcome::TransportFailure {
                    url: url.clone(),
                    error: TransportError {
                        kind: TransportKind::Other,
                        detail: format!("curl multi remove: {}", e),
                    },
                },
            };
            on_outcome(index, result);
        }

        refill::refill_active(multi, urls, opts, max_concurrent, &mut active, &mut pending, on_outcome);

        if running > 0 {
            if let Err(e) = multi.wait(&mut [], Duration::from_millis(WAIT_MS)) {
                abandon(client, urls, active, pending, &e, on_outcome);
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Report every active and pending URL as failed after the loop itself broke.
fn abandon<F>(
    client: &FetchClient,
    urls: &[String],
    active: Vec<ActiveItem>,
    pending: VecDeque<usize>,
    cause: &curl::MultiError,
    on_outcome: &mut F,
) where
    F: FnMut(usize, FetchOutcome),
{
    tracing::error!(error = %cause, in_flight = active.len(), pending = pending.len(), "curl multi loop failed");
    let detail = format!("curl multi: {}", cause);
    let mut indices = Vec::with_capacity(active.len() + pending.len());
    for (handle, index) in active {
        let _ = client.multi.remove2(handle);
        indices.push(index);
    }
    indices.extend(pending);
    for index in indices {
        on_outcome(
            index,
            FetchOutcome::TransportFailure {
                url: urls[index].clone(),
                error: TransportError {
                    kind: TransportKind::Other,
                    detail: detail.clone(),
                },
            },
        );
    }
}
