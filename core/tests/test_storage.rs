#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use cryptstream_core::crypto::{blob_hash, StreamHash};
    use cryptstream_core::storage::{BlobStore, DiskBlobStore, InMemoryBlobStore, StorageError};

    fn stream_hash() -> StreamHash {
        StreamHash::from_bytes([0x5a; 48])
    }

    // ------------------------------------------------------------
    // Shared contract, run against both backends
    // ------------------------------------------------------------
    fn exercise_contract(store: &dyn BlobStore) {
        let data = b"some ciphertext".to_vec();
        let hash = blob_hash(&data);

        assert!(!store.has_blob(&hash));
        assert!(matches!(store.get_blob(&hash), Err(StorageError::NotFound(_))));

        store.put_blob(&hash, &data).unwrap();
        assert!(store.has_blob(&hash));
        assert_eq!(store.get_blob(&hash).unwrap(), data);

        // Idempotent
        store.put_blob(&hash, &data).unwrap();
        assert_eq!(store.get_blob(&hash).unwrap(), data);

        // Integrity
        let err = store.put_blob(&hash, b"different bytes").unwrap_err();
        assert!(matches!(err, StorageError::HashMismatch { expected, .. } if expected == hash));

        assert!(matches!(store.get_descriptor(&stream_hash()), Err(StorageError::NotFound(_))));
        store.put_descriptor(&stream_hash(), b"{}").unwrap();
        assert_eq!(store.get_descriptor(&stream_hash()).unwrap(), b"{}");
    }

    #[test]
    fn memory_store_contract() {
        exercise_contract(&InMemoryBlobStore::new());
    }

    #[test]
    fn disk_store_contract() {
        let dir = tempdir().unwrap();
        exercise_contract(&DiskBlobStore::open(dir.path()).unwrap());
    }

    // ------------------------------------------------------------
    // In-memory specifics
    // ------------------------------------------------------------
    #[test]
    fn memory_store_counts_and_sizes() {
        let store = InMemoryBlobStore::new();
        assert!(store.is_empty());
        let chunks: [&[u8]; 3] = [b"aa", b"bbbb", b"aa"];
        for chunk in chunks {
            store.put_blob(&blob_hash(chunk), chunk).unwrap();
        }
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_size(), 6);
        assert_eq!(store.put_attempts(), 3);
    }

    #[test]
    fn memory_store_injected_failure_hits_only_nth_put() {
        let store = InMemoryBlobStore::failing_on_put(2);
        let data: [&[u8]; 3] = [b"one", b"two", b"three"];

        store.put_blob(&blob_hash(data[0]), data[0]).unwrap();
        assert!(matches!(
            store.put_blob(&blob_hash(data[1]), data[1]),
            Err(StorageError::Rejected(_))
        ));
        store.put_blob(&blob_hash(data[2]), data[2]).unwrap();

        assert!(!store.has_blob(&blob_hash(data[1])));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn memory_store_is_shareable_across_threads() {
        let store = Arc::new(InMemoryBlobStore::new());
        std::thread::scope(|s| {
            for t in 0..4u8 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    for i in 0..25u8 {
                        let data = [t, i];
                        store.put_blob(&blob_hash(&data), &data).unwrap();
                    }
                });
            }
        });
        assert_eq!(store.len(), 100);
    }

    // ------------------------------------------------------------
    // Disk specifics
    // ------------------------------------------------------------
    #[test]
    fn disk_layout_uses_hex_names() {
        let dir = tempdir().unwrap();
        let store = DiskBlobStore::open(dir.path()).unwrap();
        let data = b"on disk".to_vec();
        let hash = blob_hash(&data);

        store.put_blob(&hash, &data).unwrap();
        store.put_descriptor(&stream_hash(), b"doc").unwrap();

        assert_eq!(std::fs::read(dir.path().join("blobs").join(hash.to_hex())).unwrap(), data);
        assert_eq!(std::fs::read(dir.path().join("streams").join(stream_hash().to_hex())).unwrap(), b"doc");
        assert_eq!(store.root(), dir.path());
    }

    #[test]
    fn disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let data = b"durable".to_vec();
        let hash = blob_hash(&data);

        DiskBlobStore::open(dir.path()).unwrap().put_blob(&hash, &data).unwrap();

        let reopened = DiskBlobStore::open(dir.path()).unwrap();
        assert!(reopened.has_blob(&hash));
        assert_eq!(reopened.get_blob(&hash).unwrap(), data);
    }

    #[test]
    fn disk_store_detects_corruption_on_read() {
        let dir = tempdir().unwrap();
        let store = DiskBlobStore::open(dir.path()).unwrap();
        let data = b"pristine".to_vec();
        let hash = blob_hash(&data);
        store.put_blob(&hash, &data).unwrap();

        std::fs::write(dir.path().join("blobs").join(hash.to_hex()), b"bit rot").unwrap();
        assert!(matches!(store.get_blob(&hash), Err(StorageError::HashMismatch { .. })));
    }

    #[test]
    fn disk_store_rejects_mismatch_without_writing() {
        let dir = tempdir().unwrap();
        let store = DiskBlobStore::open(dir.path()).unwrap();
        let hash = blob_hash(b"claimed");

        assert!(store.put_blob(&hash, b"actual").is_err());
        assert_eq!(std::fs::read_dir(dir.path().join("blobs")).unwrap().count(), 0);
    }
}
