//! Encrypted on-disk gallery: one file per identity record.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::RwLock;

use facegate_core::FaceRecord;

use crate::codec::{self, CodecError};
use crate::crypto::{CryptoBox, CryptoError};

const RECORD_EXT: &str = "encrypted";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("gallery directory error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Outcome of a gallery load: how much was readable, how much was not.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

impl LoadReport {
    /// Record files exist but none decrypted. Without this check the
    /// condition is indistinguishable from a fresh install; it almost
    /// always means `ENCRYPTION_KEY` is wrong or was regenerated.
    pub fn nothing_readable(&self) -> bool {
        self.loaded == 0 && self.skipped > 0
    }
}

/// Owns the record directory and the in-memory gallery.
///
/// Reads (`snapshot`, `len`, `names`) run fully in parallel. `append`
/// holds the write lock across the file write and the in-memory push, so
/// concurrent appends serialize and a reader never observes a
/// half-appended entry.
pub struct GalleryStore {
    dir: PathBuf,
    crypto: CryptoBox,
    gallery: RwLock<Vec<FaceRecord>>,
}

impl GalleryStore {
    /// Open the record directory (creating it if absent) and load every
    /// readable record. Unreadable files are logged and skipped; a single
    /// bad file never aborts the load.
    pub async fn open(
        dir: impl Into<PathBuf>,
        crypto: CryptoBox,
    ) -> Result<(Self, LoadReport), StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXT) {
                paths.push(path);
            }
        }
        // Filenames carry a millisecond timestamp prefix; lexicographic
        // order restores insertion order, which scan-order matching
        // depends on.
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        let mut report = LoadReport::default();
        for path in &paths {
            match Self::read_record(&crypto, path).await {
                Ok(record) => {
                    tracing::debug!(name = %record.name, file = %path.display(), "loaded gallery record");
                    records.push(record);
                    report.loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "skipping unreadable gallery record");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            loaded = report.loaded,
            skipped = report.skipped,
            dir = %dir.display(),
            "gallery loaded"
        );

        Ok((
            Self {
                dir,
                crypto,
                gallery: RwLock::new(records),
            },
            report,
        ))
    }

    async fn read_record(crypto: &CryptoBox, path: &Path) -> Result<FaceRecord, StoreError> {
        let ciphertext = tokio::fs::read(path).await?;
        let plaintext = crypto.decrypt(&ciphertext)?;
        Ok(codec::decode(&plaintext)?)
    }

    /// Persist a record and make it visible in the in-memory gallery.
    /// Returns the record's id.
    ///
    /// The filename embeds the record's own unique id, never the gallery
    /// length, so racing appends cannot compute the same name and clobber
    /// each other.
    pub async fn append(&self, record: FaceRecord) -> Result<String, StoreError> {
        let plaintext = codec::encode(&record)?;
        let ciphertext = self.crypto.encrypt(&plaintext)?;

        let mut gallery = self.gallery.write().await;
        let filename = format!(
            "{:013}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            record.id,
            RECORD_EXT
        );
        tokio::fs::write(self.dir.join(&filename), &ciphertext).await?;

        let id = record.id.clone();
        tracing::info!(name = %record.name, id = %id, file = %filename, "gallery record appended");
        gallery.push(record);
        Ok(id)
    }

    /// Immutable copy of the current gallery for matching.
    pub async fn snapshot(&self) -> Vec<FaceRecord> {
        self.gallery.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.gallery.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.gallery.read().await.is_empty()
    }

    /// Enrolled names in insertion order (duplicates included).
    pub async fn names(&self) -> Vec<String> {
        self.gallery
            .read()
            .await
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::GalleryKey;
    use facegate_core::Embedding;
    use std::sync::Arc;

    fn crypto(secret: &str) -> CryptoBox {
        CryptoBox::new(&GalleryKey::from_secret(secret))
    }

    fn record(id: &str, name: &str, values: Vec<f32>) -> FaceRecord {
        FaceRecord {
            id: id.to_string(),
            name: name.to_string(),
            embedding: Embedding::new(values),
            created_at: "2026-08-06T12:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("gallery");
        let (store, report) = GalleryStore::open(&dir, crypto("k")).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(report, LoadReport::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_append_then_reload_roundtrips_exactly() {
        let tmp = tempfile::tempdir().unwrap();
        let original = record("0001", "alice", vec![0.1, -0.2, 0.333_333_34]);

        let (store, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        store.append(original.clone()).await.unwrap();
        assert_eq!(store.len().await, 1);

        // Fresh process: reopen the same directory.
        let (reloaded, report) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(report, LoadReport { loaded: 1, skipped: 0 });
        let gallery = reloaded.snapshot().await;
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].id, original.id);
        assert_eq!(gallery[0].name, original.name);
        for (a, b) in gallery[0]
            .embedding
            .values
            .iter()
            .zip(original.embedding.values.iter())
        {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[tokio::test]
    async fn test_load_preserves_insertion_order() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        store.append(record("0001", "alice", vec![1.0])).await.unwrap();
        store.append(record("0002", "bob", vec![2.0])).await.unwrap();
        store.append(record("0003", "carol", vec![3.0])).await.unwrap();

        let (reloaded, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(reloaded.names().await, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        store.append(record("0001", "alice", vec![1.0])).await.unwrap();

        std::fs::write(tmp.path().join("0000000000000-junk.encrypted"), b"garbage").unwrap();

        let (reloaded, report) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(report, LoadReport { loaded: 1, skipped: 1 });
        assert_eq!(reloaded.names().await, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_wrong_key_reports_nothing_readable() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = GalleryStore::open(tmp.path(), crypto("right-key")).await.unwrap();
        store.append(record("0001", "alice", vec![1.0])).await.unwrap();
        store.append(record("0002", "bob", vec![2.0])).await.unwrap();

        let (reloaded, report) = GalleryStore::open(tmp.path(), crypto("wrong-key")).await.unwrap();
        assert_eq!(report, LoadReport { loaded: 0, skipped: 2 });
        assert!(report.nothing_readable());
        assert!(reloaded.is_empty().await);
    }

    #[tokio::test]
    async fn test_unrelated_files_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("README.txt"), b"not a record").unwrap();
        let (_, report) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(!report.nothing_readable());
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        let store = Arc::new(store);

        let n = 16;
        let mut handles = Vec::with_capacity(n);
        for i in 0..n {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(record(
                        &format!("{i:04}"),
                        &format!("person-{i:02}"),
                        vec![i as f32, 0.0],
                    ))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, n);

        // Fresh process sees all of them: no lost updates, no collisions.
        let (reloaded, report) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(report, LoadReport { loaded: n, skipped: 0 });
        let mut names = reloaded.names().await;
        names.sort();
        names.dedup();
        assert_eq!(names.len(), n);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_legal() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        store.append(record("0001", "alice", vec![1.0])).await.unwrap();
        store.append(record("0002", "alice", vec![1.1])).await.unwrap();
        assert_eq!(store.names().await, vec!["alice", "alice"]);

        let (reloaded, report) = GalleryStore::open(tmp.path(), crypto("k")).await.unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(reloaded.len().await, 2);
    }
}
