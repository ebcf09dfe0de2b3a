//! Artifact persistence.
//!
//! Each body goes to a unique `.part` temp file beside its destination and is
//! renamed into place, so readers never see a partially written artifact.
//! Writers that derive the same name race only on the rename: last one wins.

mod writer;

pub use writer::ArtifactWriter;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::url_model::{artifact_filename, NamingScheme};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

static TEMP_TOKEN: AtomicU64 = AtomicU64::new(0);

/// A body persisted for one source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub source_url: String,
    pub file_path: PathBuf,
}

/// Filesystem failure while persisting one URL's body.
#[derive(Debug, thiserror::Error)]
#[error("storing {url} at {}: {source}", .path.display())]
pub struct StorageError {
    pub url: String,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Temp path for `final_path`: `<final>.<pid>-<token>.part`. Unique per call
/// within the process, and across processes sharing an output root.
pub fn temp_path(final_path: &Path, token: u64) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{}-{}{}", std::process::id(), token, TEMP_SUFFIX));
    PathBuf::from(o)
}

/// Create `root` and any missing parents. Safe to call concurrently.
pub fn ensure_output_dir(root: &Path) -> io::Result<()> {
    std::fs::create_dir_all(root)
}

/// Persist `body` for `url` under `root` using the verbatim naming scheme.
pub fn persist(root: &Path, url: &str, body: &str) -> Result<StoredArtifact, StorageError> {
    persist_with(root, url, body, NamingScheme::Verbatim)
}

/// Persist `body` for `url` under `root`, naming the file with `scheme`.
/// Overwrites any existing artifact of the same name.
pub fn persist_with(
    root: &Path,
    url: &str,
    body: &str,
    scheme: NamingScheme,
) -> Result<StoredArtifact, StorageError> {
    let file_path = root.join(artifact_filename(url, scheme));
    let fail = |source: io::Error| StorageError {
        url: url.to_string(),
        path: file_path.clone(),
        source,
    };

    ensure_output_dir(root).map_err(fail)?;

    let token = TEMP_TOKEN.fetch_add(1, Ordering::Relaxed);
    let tp = temp_path(&file_path, token);
    let mut writer = ArtifactWriter::create(&tp).map_err(fail)?;
    writer.write_body(body).map_err(fail)?;
    writer.finalize(&file_path).map_err(fail)?;

    tracing::info!(url, path = %file_path.display(), bytes = body.len(), "artifact saved");
    Ok(StoredArtifact {
        source_url: url.to_string(),
        file_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_token_and_part() {
        let p = temp_path(Path::new("out/a.com_raw.html"), 7);
        let s = p.to_string_lossy();
        assert!(s.starts_with("out/a.com_raw.html."));
        assert!(s.ends_with("-7.part"));
        assert_ne!(temp_path(Path::new("x"), 1), temp_path(Path::new("x"), 2));
    }

    #[test]
    fn persist_creates_root_and_roundtrips_body() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("raw_html_content");
        let body = "<html><body>héllo ✓</body></html>";
        let artifact = persist(&root, "https://example.com/a/b", body).unwrap();
        assert_eq!(artifact.source_url, "https://example.com/a/b");
        assert_eq!(artifact.file_path, root.join("example.com_a_b_raw.html"));
        assert_eq!(std::fs::read(&artifact.file_path).unwrap(), body.as_bytes());
    }

    #[test]
    fn persist_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        persist(dir.path(), "https://a.com", "A").unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.com_raw.html".to_string()]);
    }

    #[test]
    fn persist_colliding_urls_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = persist(dir.path(), "http://a.com/x", "first").unwrap();
        let second = persist(dir.path(), "https://a.com/x", "second").unwrap();
        assert_eq!(first.file_path, second.file_path);
        assert_eq!(std::fs::read_to_string(&second.file_path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn persist_hashed_keeps_colliding_urls_apart() {
        let dir = tempfile::tempdir().unwrap();
        let a = persist_with(dir.path(), "http://a.com/x", "first", NamingScheme::Hashed).unwrap();
        let b = persist_with(dir.path(), "https://a.com/x", "second", NamingScheme::Hashed).unwrap();
        assert_ne!(a.file_path, b.file_path);
        assert_eq!(std::fs::read_to_string(&a.file_path).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&b.file_path).unwrap(), "second");
    }

    #[test]
    fn persist_reports_storage_error_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("not_a_dir");
        std::fs::write(&root, "occupied").unwrap();
        let err = persist(&root, "https://a.com", "A").unwrap_err();
        assert_eq!(err.url, "https://a.com");
        assert_eq!(err.path, root.join("a.com_raw.html"));
        assert!(err.to_string().contains("https://a.com"));
    }

    #[test]
    fn persist_reports_storage_error_when_name_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a.com_raw.html")).unwrap();
        let err = persist(dir.path(), "https://a.com", "A").unwrap_err();
        assert_eq!(err.path, dir.path().join("a.com_raw.html"));
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(TEMP_SUFFIX)
            })
            .count();
        assert_eq!(leftovers, 0, "failed persist must remove its temp file");
    }
}
