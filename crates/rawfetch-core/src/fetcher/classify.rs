//! Classify curl errors into transport failure kinds.

use super::{TransportError, TransportKind};

/// Classify a curl error for reporting.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportKind::Connection;
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
    {
        return TransportKind::Tls;
    }
    TransportKind::Other
}

impl From<&curl::Error> for TransportError {
    fn from(e: &curl::Error) -> Self {
        let kind = classify_curl_error(e);
        let detail = match kind {
            TransportKind::Timeout => format!("timed out: {}", e),
            _ => e.to_string(),
        };
        TransportError { kind, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Codes are CURLE_* values from curl.h, left untyped since `CURLcode`
    // differs by platform.

    #[test]
    fn timeout_classified() {
        let e = curl::Error::new(28); // OPERATION_TIMEDOUT
        assert_eq!(classify_curl_error(&e), TransportKind::Timeout);
        let t = TransportError::from(&e);
        assert!(t.detail.starts_with("timed out"));
    }

    #[test]
    fn connection_errors_classified() {
        // COULDNT_RESOLVE_HOST, COULDNT_CONNECT, GOT_NOTHING
        for e in [curl::Error::new(6), curl::Error::new(7), curl::Error::new(52)] {
            assert_eq!(classify_curl_error(&e), TransportKind::Connection, "{}", e);
        }
    }

    #[test]
    fn tls_error_classified() {
        let e = curl::Error::new(35); // SSL_CONNECT_ERROR
        assert_eq!(classify_curl_error(&e), TransportKind::Tls);
    }

    #[test]
    fn other_errors_fall_through() {
        let e = curl::Error::new(47); // TOO_MANY_REDIRECTS
        assert_eq!(classify_curl_error(&e), TransportKind::Other);
        assert_eq!(TransportError::from(&e).kind, TransportKind::Other);
    }
}
