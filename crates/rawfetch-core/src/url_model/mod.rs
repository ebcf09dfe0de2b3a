//! URL modeling and artifact filename derivation.
//!
//! The verbatim scheme is a pure string substitution kept stable across
//! releases so existing output directories stay addressable. Distinct URLs
//! can collapse to the same name; the last write wins.

mod hashed;

use serde::{Deserialize, Serialize};

pub use hashed::hashed_filename;

/// Suffix appended to every derived artifact name.
pub const RAW_SUFFIX: &str = "_raw.html";

/// How artifact filenames are derived from source URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Scheme stripped, `/` and `:` replaced by `_`, `_raw.html` appended.
    #[default]
    Verbatim,
    /// Verbatim stem plus a SHA-256 prefix of the full URL; collision-free.
    Hashed,
}

/// Strips at most one leading `https://`, else one leading `http://`.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Verbatim name without the `_raw.html` suffix.
pub(crate) fn verbatim_stem(url: &str) -> String {
    strip_scheme(url).replace('/', "_").replace(':', "_")
}

/// Derives the on-disk name for `url` under the verbatim scheme.
///
/// # Examples
///
/// - `derive_filename("https://example.com/a/b")` → `"example.com_a_b_raw.html"`
/// - `derive_filename("http://x.com:8080/p")` → `"x.com_8080_p_raw.html"`
pub fn derive_filename(url: &str) -> String {
    let mut name = verbatim_stem(url);
    name.push_str(RAW_SUFFIX);
    name
}

/// Derives the artifact name for `url` under the given scheme.
pub fn artifact_filename(url: &str, scheme: NamingScheme) -> String {
    match scheme {
        NamingScheme::Verbatim => derive_filename(url),
        NamingScheme::Hashed => hashed_filename(url),
    }
}
