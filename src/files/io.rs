//! Loading and saving markdown documents
//!
//! Documents are UTF-8 text. Saves go through a temporary sibling file and a
//! rename, so a failed save leaves the previous file contents in place.

use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extensions recognised as markdown documents.
pub const MARKDOWN_EXTENSIONS: &[&str] = &[
    "md", "mkd", "mkdn", "mdwn", "mdown", "mdtxt", "mdtext", "markdown",
];

/// Check whether `path` carries a markdown file extension (case-insensitive).
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            MARKDOWN_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn ensure_markdown(path: &Path) -> Result<()> {
    if is_markdown_path(path) {
        Ok(())
    } else {
        Err(Error::UnsupportedFileType {
            path: path.to_path_buf(),
        })
    }
}

/// Read a markdown document.
///
/// # Errors
///
/// - `Error::UnsupportedFileType`: the extension is not a markdown extension
/// - `Error::FileRead`: the file is missing, unreadable, or not valid UTF-8
pub fn load(path: &Path) -> Result<String> {
    ensure_markdown(path)?;
    debug!("Loading document: {}", path.display());

    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;

    info!("Loaded {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// Write a markdown document atomically.
///
/// # Errors
///
/// - `Error::UnsupportedFileType`: the extension is not a markdown extension
/// - `Error::FileWrite`: the temporary file could not be written or renamed
pub fn save(path: &Path, text: &str) -> Result<()> {
    ensure_markdown(path)?;
    let temp_path = temp_path_for(path);
    debug!("Saving document via {}", temp_path.display());

    if let Err(e) = fs::write(&temp_path, text) {
        return Err(Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        });
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            warn!(
                "Failed to remove temporary file {}: {}",
                temp_path.display(),
                cleanup
            );
        }
        return Err(Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        });
    }

    info!("Saved {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// Hidden sibling used while saving (`notes.md` -> `.notes.md.tmp`).
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_extensions() {
        for ext in MARKDOWN_EXTENSIONS {
            let path = PathBuf::from(format!("notes.{}", ext));
            assert!(is_markdown_path(&path), "{} should be markdown", ext);
        }
        assert!(is_markdown_path(Path::new("README.MD")));
        assert!(!is_markdown_path(Path::new("notes.txt")));
        assert!(!is_markdown_path(Path::new("Makefile")));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("doc.md");

        save(&path, "# Title\n\nHei på deg 🎉\n").unwrap();
        assert_eq!(load(&path).unwrap(), "# Title\n\nHei på deg 🎉\n");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("doc.markdown");
        save(&path, "old").unwrap();
        save(&path, "new").unwrap();
        assert_eq!(load(&path).unwrap(), "new");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = load(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_load_invalid_utf8() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("image.png");
        assert!(matches!(
            save(&path, "x"),
            Err(Error::UnsupportedFileType { .. })
        ));
        assert!(!path.exists());
        assert!(matches!(load(&path), Err(Error::UnsupportedFileType { .. })));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("no/such/dir/doc.md");
        assert!(matches!(save(&path, "x"), Err(Error::FileWrite { .. })));
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/a/notes.md")),
            PathBuf::from("/a/.notes.md.tmp")
        );
    }
}
