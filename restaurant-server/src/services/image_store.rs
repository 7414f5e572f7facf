//! Image Store
//!
//! Uploaded images live in one directory as `<entityId>.<ext>`. The type is
//! sniffed from the leading bytes, never taken from the declared content
//! type or filename, and must be in the configured allow-list.
//!
//! Validation ([`ImageStore::inspect`]) is separate from writing
//! ([`ImageStore::store`]) so callers can reject an upload before touching
//! any record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("{0}")]
    InvalidFileType(String),

    #[error("Image too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Empty file provided")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// An upload that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedImage {
    pub extension: &'static str,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    allowed: Vec<String>,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, allowed: Vec<String>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            allowed,
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if needed
    pub async fn ensure_dir(&self) -> Result<(), ImageStoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Validate an upload: non-empty, within the size limit, sniffed type allowed
    pub fn inspect(&self, bytes: &[u8]) -> Result<AcceptedImage, ImageStoreError> {
        if bytes.is_empty() {
            return Err(ImageStoreError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(ImageStoreError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let format = image::guess_format(bytes).map_err(|_| {
            ImageStoreError::InvalidFileType(
                "Unrecognized file type; upload an image".to_string(),
            )
        })?;

        format
            .extensions_str()
            .iter()
            .copied()
            .find(|ext| self.allowed.iter().any(|a| a.as_str() == *ext))
            .map(|extension| AcceptedImage { extension })
            .ok_or_else(|| {
                ImageStoreError::InvalidFileType(format!(
                    "Image type {:?} is not allowed. Allowed: {}",
                    format,
                    self.allowed.join(", ")
                ))
            })
    }

    /// Write an accepted image as `<id>.<ext>`, replacing any earlier image of `id`
    ///
    /// Returns the stored file name. Earlier files of `id` are only removed
    /// once the new one is on disk; a failed write leaves them in place.
    pub async fn store(
        &self,
        id: &str,
        accepted: AcceptedImage,
        bytes: &[u8],
    ) -> Result<String, ImageStoreError> {
        self.ensure_dir().await?;
        let filename = file_name(id, accepted.extension);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        for ext in &self.allowed {
            if ext != accepted.extension {
                remove_if_exists(&self.dir.join(format!("{id}.{ext}"))).await?;
            }
        }
        tracing::debug!(filename = %filename, size = bytes.len(), "Image stored");
        Ok(filename)
    }

    /// Read the image stored for `id`, if any
    pub async fn load(&self, id: &str) -> Result<Option<StoredImage>, ImageStoreError> {
        for ext in &self.allowed {
            match tokio::fs::read(self.dir.join(format!("{id}.{ext}"))).await {
                Ok(bytes) => {
                    return Ok(Some(StoredImage {
                        bytes,
                        extension: ext.clone(),
                    }));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    /// Delete every stored image of `id`; returns whether anything was removed
    pub async fn remove(&self, id: &str) -> Result<bool, ImageStoreError> {
        let mut removed = false;
        for ext in &self.allowed {
            removed |= remove_if_exists(&self.dir.join(format!("{id}.{ext}"))).await?;
        }
        Ok(removed)
    }

    /// Read a stored file by name for serving
    ///
    /// Names that could escape the directory are refused with `None`.
    pub async fn read_named(&self, filename: &str) -> Result<Option<Vec<u8>>, ImageStoreError> {
        if !is_safe_file_name(filename) {
            return Ok(None);
        }
        match tokio::fs::read(self.dir.join(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn file_name(id: &str, extension: &str) -> String {
    format!("{id}.{extension}")
}

/// Prevent path traversal: a plain file name, no separators or parent references
pub fn is_safe_file_name(filename: &str) -> bool {
    !(filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0'))
}

async fn remove_if_exists(path: &Path) -> Result<bool, ImageStoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Smallest valid PNG header bytes accepted by the sniffer
    pub(crate) const PNG: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R',
    ];
    pub(crate) const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
    pub(crate) const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

    fn store(dir: &Path, allowed: &[&str]) -> ImageStore {
        ImageStore::new(
            dir,
            allowed.iter().map(|s| s.to_string()).collect(),
            1024,
        )
    }

    #[test]
    fn sniffs_type_from_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let images = store(dir.path(), &["png", "jpg", "jpeg"]);
        assert_eq!(images.inspect(PNG).unwrap().extension, "png");
        assert_eq!(images.inspect(JPEG).unwrap().extension, "jpg");

        assert!(matches!(
            images.inspect(b"just some text"),
            Err(ImageStoreError::InvalidFileType(_))
        ));
        // A real image outside the allow-list
        assert!(matches!(images.inspect(GIF), Err(ImageStoreError::InvalidFileType(_))));
        assert!(matches!(images.inspect(&[]), Err(ImageStoreError::Empty)));
        assert!(matches!(
            images.inspect(&vec![0u8; 2048]),
            Err(ImageStoreError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn store_load_replace_remove() {
        let dir = tempfile::tempdir().unwrap();
        let images = store(&dir.path().join("uploads"), &["png", "jpg", "gif"]);

        let png = images.inspect(PNG).unwrap();
        assert_eq!(images.store("item1", png, PNG).await.unwrap(), "item1.png");
        let loaded = images.load("item1").await.unwrap().unwrap();
        assert_eq!(loaded.bytes, PNG);
        assert_eq!(loaded.extension, "png");

        // Replacing with another type leaves exactly one file
        let gif = images.inspect(GIF).unwrap();
        images.store("item1", gif, GIF).await.unwrap();
        assert!(!images.dir().join("item1.png").exists());
        assert_eq!(images.load("item1").await.unwrap().unwrap().extension, "gif");

        assert!(images.remove("item1").await.unwrap());
        assert!(images.load("item1").await.unwrap().is_none());
        assert!(!images.remove("item1").await.unwrap());
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let images = store(dir.path(), &["png", "gif"]);
        images.store("item1", images.inspect(PNG).unwrap(), PNG).await.unwrap();

        // A directory squatting on the target name makes the write fail
        std::fs::create_dir(dir.path().join("item1.gif")).unwrap();
        let gif = images.inspect(GIF).unwrap();
        assert!(matches!(
            images.store("item1", gif, GIF).await,
            Err(ImageStoreError::Io(_))
        ));

        assert!(dir.path().join("item1.png").exists());
        let loaded = images.load("item1").await.unwrap().unwrap();
        assert_eq!(loaded.extension, "png");
        assert_eq!(loaded.bytes, PNG);
    }

    #[tokio::test]
    async fn read_named_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let images = store(dir.path(), &["png"]);
        images.store("a", images.inspect(PNG).unwrap(), PNG).await.unwrap();

        assert_eq!(images.read_named("a.png").await.unwrap().as_deref(), Some(PNG));
        assert!(images.read_named("../a.png").await.unwrap().is_none());
        assert!(images.read_named("sub/a.png").await.unwrap().is_none());
        assert!(images.read_named("missing.png").await.unwrap().is_none());
    }
}
