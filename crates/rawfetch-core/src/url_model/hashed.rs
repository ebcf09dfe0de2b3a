//! Collision-free artifact names: verbatim stem qualified by a URL digest.

use sha2::{Digest, Sha256};

use super::{verbatim_stem, RAW_SUFFIX};

/// Hex digits of the URL digest kept in the name.
const DIGEST_HEX_LEN: usize = 16;

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Derives `<stem>_<digest>_raw.html`, where `digest` is the first 16 hex
/// digits of SHA-256 over the full URL. The stem is cut on a char boundary
/// so the whole name fits in 255 bytes.
pub fn hashed_filename(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    let digest = &digest[..DIGEST_HEX_LEN];

    let stem = verbatim_stem(url);
    let budget = NAME_MAX - RAW_SUFFIX.len() - DIGEST_HEX_LEN - 1;
    let mut take = stem.len().min(budget);
    while take > 0 && !stem.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}_{}{}", &stem[..take], digest, RAW_SUFFIX)
}
