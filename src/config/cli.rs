use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// 將輸出寫到本機目錄
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::QuakeMapError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested/out"));

        storage.write_file("index.html", b"<html></html>").await.unwrap();

        let data = std::fs::read(temp_dir.path().join("nested/out/index.html")).unwrap();
        assert_eq!(data, b"<html></html>");
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("markers.json", b"[1]").await.unwrap();
        storage.write_file("markers.json", b"[]").await.unwrap();

        let data = std::fs::read(temp_dir.path().join("markers.json")).unwrap();
        assert_eq!(data, b"[]");
    }

    #[tokio::test]
    async fn test_write_into_a_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("blocker"), b"x").unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("blocker"));

        let result = storage.write_file("index.html", b"<html></html>").await;
        assert!(matches!(result, Err(QuakeMapError::IoError(_))));
    }
}
