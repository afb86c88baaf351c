//! Input file discovery.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix of the presentations picked up from a directory.
pub const PPTX_SUFFIX: &str = ".pptx";

/// List the files to process for an input path.
///
/// A directory yields every entry whose name ends in `.pptx`, in the order
/// the directory listing returns them. Anything else, including a path that
/// does not exist, is returned as the single candidate so that opening it
/// reports the problem.
pub fn discover_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to read directory {}", path.display()))?;
        if entry.file_name().to_string_lossy().ends_with(PPTX_SUFFIX) {
            files.push(entry.path());
        }
    }

    log::debug!("Found {} presentation(s) in {}", files.len(), path.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_is_its_own_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Deck.pptx");
        fs::write(&path, b"").unwrap();

        assert_eq!(discover_inputs(&path).unwrap(), vec![path]);
    }

    #[test]
    fn test_missing_path_is_passed_through() {
        let path = Path::new("/nonexistent/Deck.pptx");
        assert_eq!(discover_inputs(path).unwrap(), vec![path.to_path_buf()]);
    }

    #[test]
    fn test_directory_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pptx", "b.ppt", "notes.txt", "c.PPTX", "d.pptx"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let mut names: Vec<String> = discover_inputs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.pptx", "d.pptx"]);
    }

    #[test]
    fn test_directory_keeps_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["x.pptx", "y.pptx", "z.pptx"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let listed: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(discover_inputs(dir.path()).unwrap(), listed);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_inputs(dir.path()).unwrap().is_empty());
    }
}
