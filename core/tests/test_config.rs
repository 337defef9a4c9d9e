#[cfg(test)]
mod tests {
    use cryptstream_core::config::PipelineConfig;
    use cryptstream_core::constants::{BLOB_SIZE, DEFAULT_INFLIGHT_UNITS, DEFAULT_WORKERS, MAX_INFLIGHT_UNITS};
    use cryptstream_core::crypto::CipherSuite;
    use cryptstream_core::session::{CipherConfig, SessionContext};
    use cryptstream_core::stream::parallelism::ParallelismProfile;
    use cryptstream_core::types::StreamError;

    #[test]
    fn defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.blob_size, BLOB_SIZE);
        assert_eq!(c.workers, DEFAULT_WORKERS);
        assert_eq!(c.inflight_units, DEFAULT_INFLIGHT_UNITS);
        assert!(c.skip_existing_blobs);
        c.validate().unwrap();
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let c = PipelineConfig::from_toml_str(
            r#"
            workers = 2
            skip_existing_blobs = false
            "#,
        )
        .unwrap();
        assert_eq!(c.workers, 2);
        assert!(!c.skip_existing_blobs);
        assert_eq!(c.blob_size, BLOB_SIZE);
        assert_eq!(c.profile(), ParallelismProfile::new(2, DEFAULT_INFLIGHT_UNITS));
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let c = PipelineConfig {
            blob_size: 1024 * 1024,
            workers: 3,
            inflight_units: 5,
            skip_existing_blobs: false,
        };
        let text = toml::to_string(&c).unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let cases = [
            "blob_size = 1000",
            "blob_size = 65537",
            "blob_size = 1073741824",
            "workers = 0",
            "inflight_units = 0",
            "workers = \"many\"",
            "this is not toml",
        ];
        for case in cases {
            let err = PipelineConfig::from_toml_str(case).unwrap_err();
            assert!(matches!(err, StreamError::Config(_)), "{case}: {err}");
        }
    }

    #[test]
    fn cipher_config_resolves_suites() {
        assert_eq!(CipherConfig::default().validate().unwrap(), CipherSuite::Aes128Cbc);
        assert_eq!(CipherConfig::new(16, 32).validate().unwrap(), CipherSuite::Aes256Cbc);
        assert!(matches!(CipherConfig::new(32, 32).validate(), Err(StreamError::Config(_))));
        assert!(matches!(CipherConfig::new(16, 8).validate(), Err(StreamError::Config(_))));
    }

    #[test]
    fn scratch_session_cleans_up_on_drop() {
        let session = SessionContext::scratch(CipherConfig::default()).unwrap();
        let path = session.namespace().to_path_buf();
        assert!(session.is_scratch());
        assert!(path.is_dir());

        session.open_disk_store().unwrap();
        assert!(path.join("blobs").is_dir());

        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn fixed_session_keeps_its_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionContext::new(dir.path(), CipherConfig::new(16, 24));
        assert!(!session.is_scratch());
        assert_eq!(session.namespace(), dir.path());
        assert_eq!(session.cipher().key_len, 24);
        drop(session);
        assert!(dir.path().exists());
    }

    #[test]
    fn parallelism_profiles_are_never_zero() {
        assert_eq!(ParallelismProfile::new(0, 0), ParallelismProfile::new(1, 1));
        assert_eq!(ParallelismProfile::single_threaded(), ParallelismProfile::new(1, 1));

        let p = ParallelismProfile::dynamic(BLOB_SIZE as u64, 0.5, MAX_INFLIGHT_UNITS);
        assert!(p.workers >= 1);
        assert!((1..=MAX_INFLIGHT_UNITS).contains(&p.inflight_units));

        PipelineConfig::dynamic().validate().unwrap();
    }
}
