use std::path::PathBuf;

use async_trait::async_trait;

/// Seam for avatar/file uploads; the rest of the system only ever stores the
/// returned URL.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(&self, bytes: &[u8], path: &str) -> std::io::Result<String>;
}

/// Writes blobs under the static directory and returns a URL served by the
/// `/static` route. An object store would implement the same trait.
pub struct LocalBlobStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStorage {
    pub fn new(root: &str, public_prefix: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(&self, bytes: &[u8], path: &str) -> std::io::Result<String> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(format!("{}/{}", self.public_prefix, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_the_file_and_returns_its_url() {
        let dir = std::env::temp_dir().join("skillscribe-storage-test");
        let storage = LocalBlobStorage::new(&dir.to_string_lossy(), "/static/");

        let url = storage.upload(b"bytes", "avatars/a.png").await.unwrap();
        assert_eq!(url, "/static/avatars/a.png");
        assert_eq!(tokio::fs::read(dir.join("avatars/a.png")).await.unwrap(), b"bytes");
    }
}
