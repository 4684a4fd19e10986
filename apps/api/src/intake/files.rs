//! Local file store for uploaded résumés.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

/// Extensions accepted at the upload boundary.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: PathBuf) -> Self {
        Self { upload_dir }
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .with_context(|| {
                format!("cannot create upload dir {}", self.upload_dir.display())
            })
    }

    pub fn allowed_file(filename: &str) -> bool {
        extension(filename)
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }

    /// Saves the upload under a fresh UUID-based name (client filenames are
    /// never reused) and returns the generated filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let ext = extension(original_name).context("filename has no extension")?;
        let unique = format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase());
        let path = self.path_of(&unique);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("cannot write upload to {}", path.display()))?;
        Ok(unique)
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }
}

fn extension(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file_accepts_pdf_any_case() {
        assert!(FileStore::allowed_file("resume.pdf"));
        assert!(FileStore::allowed_file("Resume.PDF"));
    }

    #[test]
    fn test_allowed_file_rejects_other_types() {
        assert!(!FileStore::allowed_file("resume.docx"));
        assert!(!FileStore::allowed_file("resume.pdf.exe"));
        assert!(!FileStore::allowed_file("resume"));
        assert!(!FileStore::allowed_file("resume."));
    }

    #[tokio::test]
    async fn test_save_writes_bytes_under_unique_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        let first = store.save("cv.pdf", b"%PDF-1.4 one").await.unwrap();
        let second = store.save("cv.pdf", b"%PDF-1.4 two").await.unwrap();
        assert_ne!(first, second);
        assert!(first.ends_with(".pdf"));

        let bytes = tokio::fs::read(store.path_of(&first)).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 one");
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        let store = FileStore::new(uploads.clone());
        store.ensure_dir().await.unwrap();
        store.ensure_dir().await.unwrap();
        assert!(uploads.is_dir());
    }
}
