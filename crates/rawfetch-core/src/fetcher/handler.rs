//! Easy2 Handler for one page fetch in the curl multi backend.
//! Buffers response headers of the current hop and the full body.

use std::str;

/// Handler state for one transfer. Implements curl's Handler for Easy2.
#[derive(Debug, Default)]
pub struct BodyHandler {
    pub(super) response_headers: Vec<String>,
    pub(super) body: Vec<u8>,
}

impl BodyHandler {
    pub(super) fn new() -> Self {
        Self::default()
    }
}

impl curl::easy::Handler for BodyHandler {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(s) = str::from_utf8(data) {
            let line = s.trim_end();
            if line.starts_with("HTTP/") {
                // New hop (redirect or 100 Continue): only the last response counts.
                self.response_headers.clear();
                self.body.clear();
            }
            if !line.is_empty() {
                self.response_headers.push(line.to_string());
            }
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }
}
