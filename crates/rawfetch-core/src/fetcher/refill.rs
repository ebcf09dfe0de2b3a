//! Refill helpers for the multi event loop: configure one Easy2 per URL and
//! keep the active set full.

use std::collections::VecDeque;

use super::handler::BodyHandler;
use super::{FetchOptions, FetchOutcome, TransportError, TransportKind};

/// Active entry in the multi event loop: handle + index into the URL list.
pub(super) type ActiveItem = (curl::multi::Easy2Handle<BodyHandler>, usize);

fn configure(easy: &mut curl::easy::Easy2<BodyHandler>, url: &str, opts: &FetchOptions) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(opts.follow_redirects)?;
    if opts.follow_redirects {
        easy.max_redirections(opts.max_redirects)?;
    }
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    // Empty string: advertise every encoding libcurl can decode.
    easy.accept_encoding("")?;
    if let Some(ref ua) = opts.user_agent {
        easy.useragent(ua)?;
    }
    Ok(())
}

/// Add a new Easy2 handle for `url` to the multi handle.
pub(super) fn add_easy_to_multi(
    multi: &curl::multi::Multi,
    url: &str,
    opts: &FetchOptions,
) -> Result<curl::multi::Easy2Handle<BodyHandler>, TransportError> {
    let mut easy = curl::easy::Easy2::new(BodyHandler::new());
    configure(&mut easy, url, opts).map_err(|e| TransportError::from(&e))?;
    multi.add2(easy).map_err(|e| TransportError {
        kind: TransportKind::Other,
        detail: format!("curl multi add: {}", e),
    })
}

/// Refill the active set with pending URLs until `max_concurrent` handles are
/// in flight or nothing is left. A URL whose handle cannot be set up gets its
/// transport failure reported immediately and does not occupy a slot.
pub(super) fn refill_active<F>(
    multi: &curl::multi::Multi,
    urls: &[String],
    opts: &FetchOptions,
    max_concurrent: usize,
    active: &mut Vec<ActiveItem>,
    pending: &mut VecDeque<usize>,
    on_outcome: &mut F,
) where
    F: FnMut(usize, FetchOutcome),
{
    while active.len() < max_concurrent {
        let Some(index) = pending.pop_front() else {
            break;
        };
        let url = &urls[index];
        match add_easy_to_multi(multi, url, opts) {
            Ok(h) => {
                tracing::debug!(url = %url, in_flight = active.len() + 1, "request started");
                active.push((h, index));
            }
            Err(error) => on_outcome(
                index,
                FetchOutcome::TransportFailure {
                    url: url.clone(),
                    error,
                },
            ),
        }
    }
}
