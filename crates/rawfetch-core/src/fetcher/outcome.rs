//! Build a FetchOutcome from a completed Easy2 transfer (result + code + handler state).

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use super::handler::BodyHandler;
use super::{FetchOutcome, TransportError, TransportKind};

/// Only this status counts as a fetched page.
pub const SUCCESS_STATUS: u32 = 200;

/// Classify a finished transfer. Transport errors win over status; any status
/// other than 200 is an HTTP failure and its body is discarded.
pub(super) fn outcome_from_transfer(
    url: &str,
    transfer: Result<(), curl::Error>,
    code: u32,
    handler: &mut BodyHandler,
) -> FetchOutcome {
    if let Err(e) = transfer {
        return FetchOutcome::TransportFailure {
            url: url.to_string(),
            error: TransportError::from(&e),
        };
    }
    if code != SUCCESS_STATUS {
        return FetchOutcome::HttpFailure {
            url: url.to_string(),
            status: code as u16,
        };
    }
    let charset = response_charset(&handler.response_headers);
    let bytes = std::mem::take(&mut handler.body);
    match decode_body(bytes, charset.as_deref()) {
        Ok(body) => FetchOutcome::Success {
            url: url.to_string(),
            body,
            status: code as u16,
        },
        Err(detail) => FetchOutcome::TransportFailure {
            url: url.to_string(),
            error: TransportError {
                kind: TransportKind::Decode,
                detail,
            },
        },
    }
}

/// `charset` parameter of the last `Content-Type` header, lowercased.
pub(super) fn response_charset(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"))
        .last()
        .and_then(|(_, value)| {
            value.split(';').skip(1).find_map(|param| {
                let (k, v) = param.split_once('=')?;
                if k.trim().eq_ignore_ascii_case("charset") {
                    Some(v.trim().trim_matches('"').to_ascii_lowercase())
                } else {
                    None
                }
            })
        })
}

/// Decode a body as text using the declared charset (UTF-8 when absent or
/// unknown). Malformed input is an error, never replaced.
pub(super) fn decode_body(bytes: Vec<u8>, charset: Option<&str>) -> Result<String, String> {
    let declared = charset.and_then(|label| Encoding::for_label(label.as_bytes()));
    let encoding = declared.unwrap_or(UTF_8);
    if encoding == UTF_8 {
        return String::from_utf8(bytes).map_err(|e| match (charset, declared) {
            (Some(cs), None) => {
                format!("body is not valid UTF-8 (unknown charset {}): {}", cs, e.utf8_error())
            }
            _ => format!("body is not valid UTF-8: {}", e.utf8_error()),
        });
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| format!("body is not valid {}", encoding.name()))
}
