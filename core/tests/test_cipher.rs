#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use aes::cipher::generic_array::GenericArray;
    use aes::cipher::{BlockDecrypt, KeyInit};
    use proptest::prelude::*;

    use cryptstream_core::crypto::{
        blob_hash, padded_len, BlobHash, BlockCipherImpl, CipherSuite, CryptoError, Iv, IvSupplier, RandomIvs,
        StreamKey,
    };

    fn aes128(key: &[u8]) -> BlockCipherImpl {
        BlockCipherImpl::from_suite_and_key(CipherSuite::Aes128Cbc, &StreamKey::from(key)).unwrap()
    }

    fn decrypt_128(key: &[u8], iv: &Iv, ciphertext: &[u8]) -> Vec<u8> {
        let cipher = aes::Aes128::new_from_slice(key).unwrap();
        let mut prev = *iv;
        let mut out = Vec::new();
        for block in ciphertext.chunks_exact(16) {
            let mut b = GenericArray::clone_from_slice(block);
            cipher.decrypt_block(&mut b);
            for (x, p) in b.iter_mut().zip(prev.iter()) {
                *x ^= p;
            }
            out.extend_from_slice(&b);
            prev.copy_from_slice(block);
        }
        let pad = *out.last().unwrap() as usize;
        out.truncate(out.len() - pad);
        out
    }

    // NIST SP 800-38A F.2.1, first block.
    #[test]
    fn cbc_known_answer() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv: Iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap().try_into().unwrap();
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let ct = aes128(&key).encrypt_unit(&iv, &pt);
        assert_eq!(ct.len(), 32, "full block gets a whole padding block");
        assert_eq!(hex::encode(&ct[..16]), "7649abac8119b246cee98e9b12e9197d");
    }

    #[test]
    fn empty_plaintext_has_empty_ciphertext() {
        assert!(aes128(&[1; 16]).encrypt_unit(&[0; 16], &[]).is_empty());
        assert_eq!(padded_len(0), 0);
    }

    #[test]
    fn padded_lengths() {
        assert_eq!(padded_len(1), 16);
        assert_eq!(padded_len(15), 16);
        assert_eq!(padded_len(16), 32);
        assert_eq!(padded_len(2 * 1024 * 1024 - 1), 2 * 1024 * 1024);
    }

    #[test]
    fn iv_changes_ciphertext() {
        let c = aes128(&[1; 16]);
        assert_ne!(c.encrypt_unit(&[0; 16], b"hello"), c.encrypt_unit(&[1; 16], b"hello"));
    }

    #[test]
    fn suites_resolve_by_key_length() {
        assert_eq!(CipherSuite::resolve(16, 16).unwrap(), CipherSuite::Aes128Cbc);
        assert_eq!(CipherSuite::resolve(16, 24).unwrap(), CipherSuite::Aes192Cbc);
        assert_eq!(CipherSuite::resolve(16, 32).unwrap(), CipherSuite::Aes256Cbc);
        assert!(matches!(CipherSuite::resolve(8, 16), Err(CryptoError::UnsupportedCipher { .. })));
        assert!(matches!(CipherSuite::resolve(16, 20), Err(CryptoError::UnsupportedCipher { .. })));
        assert_eq!(CipherSuite::Aes256Cbc.to_string(), "aes-256-cbc");
    }

    #[test]
    fn key_length_must_match_suite() {
        let err = BlockCipherImpl::from_suite_and_key(CipherSuite::Aes192Cbc, &StreamKey::new(vec![0; 16])).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLen { expected: 24, actual: 16 }));

        for suite in [CipherSuite::Aes128Cbc, CipherSuite::Aes192Cbc, CipherSuite::Aes256Cbc] {
            let key = StreamKey::generate(suite);
            assert_eq!(key.len(), suite.key_len());
            assert_eq!(BlockCipherImpl::from_suite_and_key(suite, &key).unwrap().suite(), suite);
        }
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = StreamKey::new(vec![0xAB; 16]);
        let shown = format!("{key:?}");
        assert!(!shown.to_lowercase().contains("ab"), "{shown}");
        assert_eq!(key.to_hex(), "ab".repeat(16));
    }

    #[test]
    fn blob_hash_hex_roundtrip() {
        let h = blob_hash(b"ciphertext");
        assert_eq!(h.to_hex().len(), 96);
        assert_eq!(h.to_hex(), h.to_hex().to_lowercase());
        assert_eq!(h.to_hex().parse::<BlobHash>().unwrap(), h);
        assert!(BlobHash::from_hex("abc").is_err());
        assert_eq!(serde_json::to_string(&h).unwrap(), format!("\"{}\"", h.to_hex()));
    }

    // ------------------------------------------------------------
    // IV supplier
    // ------------------------------------------------------------
    #[test]
    fn iv_supplier_is_ordered_and_finite() {
        let ivs = IvSupplier::new(vec![[1; 16], [2; 16]]);
        assert_eq!(ivs.next_iv().unwrap(), [1; 16]);
        assert_eq!(ivs.next_iv().unwrap(), [2; 16]);
        assert!(matches!(ivs.next_iv(), Err(CryptoError::IvExhausted { issued: 2 })));
        assert_eq!(ivs.issued(), 2);
    }

    #[test]
    fn prefetch_keeps_order_and_continues() {
        let ivs = IvSupplier::new((1u8..=5).map(|i| [i; 16])).prefetch(3).unwrap();
        assert_eq!(ivs.issued(), 0);
        let drawn: Vec<Iv> = (0..5).map(|_| ivs.next_iv().unwrap()).collect();
        assert_eq!(drawn, (1u8..=5).map(|i| [i; 16]).collect::<Vec<_>>());
        assert!(matches!(ivs.next_iv(), Err(CryptoError::IvExhausted { issued: 5 })));
    }

    #[test]
    fn prefetch_reports_shortfall() {
        let err = IvSupplier::new(vec![[0; 16]; 2]).prefetch(4).unwrap_err();
        assert!(matches!(err, CryptoError::IvExhausted { issued: 2 }));
    }

    #[test]
    fn iv_supplier_is_shared_across_threads() {
        let ivs = IvSupplier::new((0u8..=255).map(|i| [i; 16]));
        let seen: Vec<Iv> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..64).map(|_| ivs.next_iv().unwrap()).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        let unique: HashSet<Iv> = seen.iter().copied().collect();
        assert_eq!(unique.len(), 256);
        assert_eq!(ivs.issued(), 256);
    }

    #[test]
    fn random_ivs_do_not_repeat() {
        let ivs: HashSet<Iv> = RandomIvs.take(64).collect();
        assert_eq!(ivs.len(), 64);
    }

    proptest! {
        #[test]
        fn decrypts_back_to_plaintext(pt in proptest::collection::vec(any::<u8>(), 1..600), key in any::<[u8; 16]>(), iv in any::<[u8; 16]>()) {
            let ct = aes128(&key).encrypt_unit(&iv, &pt);
            prop_assert_eq!(ct.len(), padded_len(pt.len()));
            prop_assert_eq!(decrypt_128(&key, &iv, &ct), pt);
        }

        #[test]
        fn encryption_is_deterministic(pt in proptest::collection::vec(any::<u8>(), 0..200)) {
            let c = aes128(&[7; 16]);
            prop_assert_eq!(c.encrypt_unit(&[9; 16], &pt), c.encrypt_unit(&[9; 16], &pt));
        }
    }
}
