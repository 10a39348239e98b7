//! Product corpus discovery and loading.
//!
//! A product is a directory `<assets_root>/<product_id>/` holding plain-text
//! files. Only files whose name ends in `.txt` take part; their contents are
//! concatenated in file-name order, each followed by a single `\n`.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::QaError;

/// Concatenated text of every document belonging to one product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    text: Arc<str>,
    files: usize,
}

impl Corpus {
    pub fn new(text: impl Into<Arc<str>>, files: usize) -> Self {
        Self {
            text: text.into(),
            files,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of documents that contributed to the text.
    pub fn files(&self) -> usize {
        self.files
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Resolves product identifiers to corpora.
#[async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Path of the product directory.
    ///
    /// # Errors
    /// [`QaError::ProductNotFound`] when the product has no directory.
    async fn locate(&self, product_id: &str) -> Result<PathBuf, QaError>;

    /// Reads the corpus stored in `dir`.
    async fn load(&self, dir: &Path) -> Result<Corpus, QaError>;
}

/// Loader backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FsCorpusLoader {
    assets_root: PathBuf,
}

impl FsCorpusLoader {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
        }
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }
}

#[async_trait]
impl CorpusLoader for FsCorpusLoader {
    async fn locate(&self, product_id: &str) -> Result<PathBuf, QaError> {
        if !is_plain_name(product_id) {
            debug!(product_id, "locate: rejected identifier");
            return Err(QaError::ProductNotFound(product_id.to_string()));
        }

        let dir = self.assets_root.join(product_id);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(QaError::ProductNotFound(product_id.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(QaError::ProductNotFound(product_id.to_string()))
            }
            Err(e) => Err(QaError::io(dir, e)),
        }
    }

    async fn load(&self, dir: &Path) -> Result<Corpus, QaError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| QaError::io(dir, e))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| QaError::io(dir, e))? {
            let path = entry.path();
            if !has_txt_extension(&path) {
                continue;
            }
            let file_type = entry.file_type().await.map_err(|e| QaError::io(&path, e))?;
            if file_type.is_dir() {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut text = String::new();
        for path in &paths {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| QaError::io(path, e))?;
            trace!(file = %path.display(), bytes = content.len(), "load: read document");
            text.push_str(&content);
            text.push('\n');
        }

        debug!(dir = %dir.display(), files = paths.len(), bytes = text.len(), "corpus loaded");
        Ok(Corpus::new(text, paths.len()))
    }
}

/// A single normal path component: no separators, no `.`/`..`, not empty.
fn is_plain_name(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == id
    )
}

/// Name ends in `.txt`; a file named exactly `.txt` counts too.
fn has_txt_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_suffix_matches_on_the_file_name() {
        assert!(has_txt_extension(Path::new("p/a.txt")));
        assert!(has_txt_extension(Path::new("p/.txt")));
        assert!(!has_txt_extension(Path::new("p/a.txt.bak")));
        assert!(!has_txt_extension(Path::new("p/a.TXT")));
    }

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn concatenates_txt_files_in_name_order() {
        let root = tempfile::tempdir().unwrap();
        let product = root.path().join("p1");
        std::fs::create_dir(&product).unwrap();
        write(&product, "b.txt", "Second");
        write(&product, "a.txt", "First");
        write(&product, "notes.md", "ignored");
        write(&product, ".txt", "Zeroth");
        std::fs::create_dir(product.join("nested.txt")).unwrap();

        let loader = FsCorpusLoader::new(root.path());
        let dir = loader.locate("p1").await.unwrap();
        let corpus = loader.load(&dir).await.unwrap();

        assert_eq!(corpus.text(), "Zeroth\nFirst\nSecond\n");
        assert_eq!(corpus.files(), 3);
    }

    #[tokio::test]
    async fn empty_product_directory_gives_blank_corpus() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("empty")).unwrap();

        let loader = FsCorpusLoader::new(root.path());
        let dir = loader.locate("empty").await.unwrap();
        let corpus = loader.load(&dir).await.unwrap();
        assert!(corpus.is_blank());
        assert_eq!(corpus.files(), 0);
    }

    #[tokio::test]
    async fn missing_or_unsafe_products_are_not_found() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "file.txt", "not a product");
        let loader = FsCorpusLoader::new(root.path());

        for id in ["ghost", "", "..", ".", "../etc", "a/b", "file.txt"] {
            assert!(
                matches!(loader.locate(id).await, Err(QaError::ProductNotFound(_))),
                "{id:?} should be not found"
            );
        }
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_io_failure() {
        let root = tempfile::tempdir().unwrap();
        let product = root.path().join("bin");
        std::fs::create_dir(&product).unwrap();
        std::fs::write(product.join("x.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let loader = FsCorpusLoader::new(root.path());
        let err = loader.load(&product).await.unwrap_err();
        assert!(matches!(err, QaError::Io { .. }));
    }
}
