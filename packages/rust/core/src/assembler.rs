//! Output directory assembler.
//!
//! Owns the on-disk layout of a build and writes every output file
//! atomically (temp file, then rename).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use docbuild_shared::{DocBuildError, DocMeta, Result};

/// Paths of every output the build writes.
///
/// ```text
/// <output_dir>/
/// ├── rendered/
/// │   └── {slug}.html
/// ├── search/
/// │   └── lexemes.ndjson
/// └── meta.json
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub rendered_dir: PathBuf,
    pub search_dir: PathBuf,
    pub lexemes_path: PathBuf,
    pub meta_path: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path) -> Self {
        let search_dir = output_dir.join("search");
        Self {
            root: output_dir.to_path_buf(),
            rendered_dir: output_dir.join("rendered"),
            lexemes_path: search_dir.join("lexemes.ndjson"),
            search_dir,
            meta_path: output_dir.join("meta.json"),
        }
    }

    /// Create `rendered/` and `search/` (and the root) if missing.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.root, &self.rendered_dir, &self.search_dir] {
            std::fs::create_dir_all(dir).map_err(|e| DocBuildError::io(dir, e))?;
        }
        Ok(())
    }

    /// Path of the rendered fragment for `slug`.
    pub fn rendered_path(&self, slug: &str) -> PathBuf {
        self.rendered_dir.join(format!("{slug}.html"))
    }

    /// Write one document's unwrapped HTML fragment.
    pub fn write_rendered(&self, slug: &str, html: &str) -> Result<PathBuf> {
        let path = self.rendered_path(slug);
        write_atomic(&path, html.as_bytes())?;
        Ok(path)
    }

    /// Write `meta.json` as a pretty-printed array with a trailing newline.
    pub fn write_meta(&self, metas: &[DocMeta]) -> Result<()> {
        write_json_pretty(&self.meta_path, metas)
    }
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Write `contents` to a hidden temp file next to `path`, then rename over it.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DocBuildError::io(path, std::io::Error::other("path has no file name")))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, contents).map_err(|e| DocBuildError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DocBuildError::io(path, e))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_paths() {
        let layout = OutputLayout::new(Path::new("/out"));
        assert_eq!(layout.rendered_path("routing"), Path::new("/out/rendered/routing.html"));
        assert_eq!(layout.lexemes_path, Path::new("/out/search/lexemes.ndjson"));
        assert_eq!(layout.meta_path, Path::new("/out/meta.json"));
    }

    #[test]
    fn atomic_write_overwrites_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("file.txt")]);
    }

    #[test]
    fn meta_json_is_pretty_array() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        layout.create_dirs().unwrap();
        layout
            .write_meta(&[DocMeta {
                version: "1.x".into(),
                slug: "routing".into(),
                title: "Routing".into(),
            }])
            .unwrap();

        let content = std::fs::read_to_string(&layout.meta_path).unwrap();
        assert_eq!(
            content,
            "[\n  {\n    \"version\": \"1.x\",\n    \"slug\": \"routing\",\n    \"title\": \"Routing\"\n  }\n]\n"
        );
    }

    #[test]
    fn write_into_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(&tmp.path().join("absent"));
        let err = layout.write_rendered("x", "<p></p>").unwrap_err();
        assert!(matches!(err, DocBuildError::Io { .. }));
    }
}
