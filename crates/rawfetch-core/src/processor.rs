//! Post-persist hook.
//!
//! The driver hands every stored artifact and its decoded body to a
//! `BodyProcessor` right after the file is in place. Extraction logic lives
//! outside this crate; the default processor does nothing.

use anyhow::Result;

use crate::storage::StoredArtifact;

/// Receives each successfully stored page. An error is reported for that URL
/// only and never affects other URLs in the run.
pub trait BodyProcessor {
    fn process(&mut self, artifact: &StoredArtifact, body: &str) -> Result<()>;
}

/// Processor that accepts every page and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl BodyProcessor for NoopProcessor {
    fn process(&mut self, _artifact: &StoredArtifact, _body: &str) -> Result<()> {
        Ok(())
    }
}
