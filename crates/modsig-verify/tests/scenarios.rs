//! End-to-end verification against real RSA-2048 fixtures

use std::path::PathBuf;

use modsig_crypto::{CertEncoding, HashAlgorithm};
use modsig_test_helpers::prelude::*;
use modsig_verify::prelude::*;
use tempfile::TempDir;

fn store_with(certs: &[&[u8]]) -> CertStore {
    let mut store = CertStore::new();
    for cert in certs {
        assert_eq!(store.load_bytes_with(default_provider(), cert, None), 1);
    }
    store
}

fn module_file(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = must(tempfile::tempdir());
    let path = write_file(dir.path(), "module.ko", bytes);
    (dir, path)
}

fn s2_module() -> Vec<u8> {
    SignedModuleBuilder::new(vec![0xAB; 4096]).build()
}

mod scenarios {
    use super::*;

    #[test]
    fn test_s1_unsigned() {
        let (_dir, path) = module_file(&unsigned_module(2048));
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(!result.has_signature);
        assert!(!result.valid);
        assert_eq!(result.signature_offset, -1);
        assert_eq!(result.signature_size, 0);
        assert_eq!(
            result.error_message.as_deref(),
            Some("No signature found in module")
        );
        assert!(result.is_consistent());
    }

    #[test]
    fn test_s2_signed_trusted() {
        let (_dir, path) = module_file(&s2_module());
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(result.valid, "{:?}", result.error_message);
        assert_eq!(result.signer.as_deref(), Some(SIGNER_A_FINGERPRINT));
        assert_eq!(result.algorithm.as_deref(), Some("rsa"));
        assert_eq!(result.hash_algorithm.as_deref(), Some("sha256"));
        assert_eq!(result.signature_offset, 4096);
        assert_eq!(result.signature_size, 256);
        assert!(result.error_message.is_none());
        assert!(result.is_consistent());
    }

    #[test]
    fn test_s3_signed_untrusted() {
        let (_dir, path) = module_file(&s2_module());
        let store = store_with(&[SIGNER_B_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(!result.valid);
        assert!(result.signer.is_none());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Signature verification failed against all certificates")
        );
        assert_eq!(result.signature_offset, 4096);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_s4_malformed_padding() {
        let module = SignedModuleBuilder::new(vec![0xAB; 4096])
            .padding([0x01, 0, 0])
            .build();
        let (_dir, path) = module_file(&module);
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(!result.valid);
        assert_eq!(result.signature_offset, -1);
        assert_eq!(result.signature_size, 0);
        let message = must_some(result.error_message.clone(), "error message");
        assert!(message.starts_with("Malformed signature trailer"), "{message}");
        assert!(result.is_consistent());
    }

    #[test]
    fn test_s5_oversized_sig_len() {
        let file_len = 4096 + 256 + 40;
        let module = SignedModuleBuilder::new(vec![0xAB; 4096])
            .sig_len(file_len)
            .build();
        assert_eq!(module.len(), file_len as usize);
        let (_dir, path) = module_file(&module);
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(!result.valid);
        assert!(matches!(result.error(), Some(VerifyError::Malformed(_))));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_s6_content_tamper() {
        let mut module = s2_module();
        if let Some(b) = module.get_mut(100) {
            *b ^= 0x01;
        }
        let (_dir, path) = module_file(&module);
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(!result.valid);
        assert_eq!(result.error(), Some(VerifyError::NoTrustedSigner));
    }
}

mod store_behaviour {
    use super::*;

    #[test]
    fn test_first_matching_certificate_wins() {
        let (_dir, path) = module_file(&s2_module());

        let store = store_with(&[SIGNER_A_CERT_PEM, SIGNER_A_REISSUED_CERT_PEM]);
        let result = verify_module_signature(&store, &path);
        assert_eq!(result.signer.as_deref(), Some(SIGNER_A_FINGERPRINT));

        let store = store_with(&[SIGNER_A_REISSUED_CERT_PEM, SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);
        assert_eq!(result.signer.as_deref(), Some(SIGNER_A_REISSUED_FINGERPRINT));
    }

    #[test]
    fn test_untrusted_certificates_before_signer_are_skipped() {
        let (_dir, path) = module_file(&s2_module());
        let store = store_with(&[EC_P256_CERT_PEM, SIGNER_B_CERT_PEM, SIGNER_A_CERT_DER]);
        let result = verify_module_signature(&store, &path);
        assert!(result.valid);
        assert_eq!(result.signer.as_deref(), Some(SIGNER_A_FINGERPRINT));
    }

    #[test]
    fn test_empty_store() {
        let (_dir, path) = module_file(&s2_module());
        let store = CertStore::new();
        let result = verify_module_signature(&store, &path);

        assert!(result.has_signature);
        assert!(!result.valid);
        assert_eq!(result.error_message.as_deref(), Some("No certificates loaded"));
        assert_eq!(result.signature_offset, 4096);
    }

    #[test]
    fn test_loading_twice_is_idempotent() {
        let dir = cert_dir(&[("phoenixguard.pem", SIGNER_A_CERT_PEM)]);
        let mut store = CertStore::new();
        assert_eq!(store.load_dir(dir.path()), 1);
        assert_eq!(store.load_dir(dir.path()), 0);
        assert_eq!(store.load_file(&dir.path().join("phoenixguard.pem")), 0);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_fingerprint_same_for_pem_and_der() {
        let dir = cert_dir(&[
            ("user_secureboot.der", SIGNER_A_CERT_DER),
            ("phoenixguard.pem", SIGNER_A_CERT_PEM),
        ]);
        let mut store = CertStore::new();
        assert_eq!(store.load_dir(dir.path()), 1);

        let inventory = store.inventory();
        assert_eq!(inventory.len(), 1);
        let info = must_some(inventory.first(), "inventory row");
        assert_eq!(info.fingerprint, SIGNER_A_FINGERPRINT);
        // Last load wins: the PEM file replaced the DER entry.
        assert_eq!(info.encoding, CertEncoding::Pem);
        assert_eq!(
            info.source.as_deref(),
            Some(dir.path().join("phoenixguard.pem").as_path())
        );
    }

    #[test]
    fn test_load_dir_uses_recognition_order() {
        let dir = cert_dir(&[
            ("phoenixguard.crt", SIGNER_B_CERT_PEM),
            ("user_secureboot.crt", SIGNER_A_CERT_PEM),
            ("other.pem", SIGNER_A_REISSUED_CERT_PEM),
        ]);
        let mut store = CertStore::new();
        assert_eq!(store.load_dir(dir.path()), 2);

        let fingerprints: Vec<&str> = store.iter().map(|c| c.fingerprint()).collect();
        assert_eq!(fingerprints, vec![SIGNER_A_FINGERPRINT, SIGNER_B_FINGERPRINT]);
    }

    #[test]
    fn test_inventory_details() {
        let store = store_with(&[SIGNER_A_CERT_PEM, EC_P256_CERT_PEM]);
        let inventory = store.inventory();
        assert_eq!(inventory.len(), 2);

        let a = must_some(inventory.first(), "signer a");
        assert_eq!(a.subject.as_deref(), Some(SIGNER_A_SUBJECT));
        assert_eq!(a.key_algorithm, "rsa");
        assert!(a.source.is_none());

        let ec = must_some(inventory.get(1), "ec cert");
        assert_eq!(ec.fingerprint, EC_P256_FINGERPRINT);
        assert_ne!(ec.key_algorithm, "rsa");
    }

    #[test]
    fn test_lookup_by_fingerprint() {
        let store = store_with(&[SIGNER_A_CERT_PEM, SIGNER_B_CERT_DER]);
        assert!(store.contains(SIGNER_B_FINGERPRINT));
        assert!(store.contains(&SIGNER_A_FINGERPRINT.to_uppercase()));
        let cert = must_some(store.get(SIGNER_B_FINGERPRINT), "signer b");
        assert_eq!(cert.encoding(), CertEncoding::Der);
        assert!(!store.contains(SIGNER_A_REISSUED_FINGERPRINT));
    }

    #[test]
    fn test_snapshot_outlives_clear() {
        let mut store = store_with(&[SIGNER_A_CERT_PEM]);
        let snapshot = store.snapshot();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(snapshot.len(), 1);
        snapshot.close();
    }
}

mod algorithms {
    use super::*;

    #[test]
    fn test_every_hash_verifies() {
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        for hash in HashAlgorithm::ALL {
            let module = SignedModuleBuilder::new(vec![0x3C; 1500]).hash(hash).build();
            let (_dir, path) = module_file(&module);
            let result = verify_module_signature(&store, &path);
            assert!(result.valid, "{hash}: {:?}", result.error_message);
            assert_eq!(result.hash_algorithm.as_deref(), Some(hash.name()));
        }
    }

    #[test]
    fn test_hash_id_mismatch_fails() {
        let module = SignedModuleBuilder::new(vec![0x3C; 1500])
            .hash(HashAlgorithm::Sha256)
            .hash_id(HashAlgorithm::Sha512.id())
            .build();
        let (_dir, path) = module_file(&module);
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);
        assert!(result.has_signature);
        assert!(!result.valid);
        assert_eq!(result.hash_algorithm.as_deref(), Some("sha512"));
    }

    #[test]
    fn test_signer_name_and_key_id_do_not_matter() {
        let module = SignedModuleBuilder::new(vec![0x3C; 1500])
            .signer_name(b"Some Other Signer")
            .key_id(&[0x99; 20])
            .build();
        let (_dir, path) = module_file(&module);
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let result = verify_module_signature(&store, &path);
        assert!(result.valid, "{:?}", result.error_message);
        assert_eq!(result.signature_offset, 1500);
    }

    #[test]
    fn test_unsupported_algorithm_from_provider() {
        let module = s2_module();
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let provider = ScriptedProvider::sequence([true]).unsupported();
        let result = Verifier::with_provider(&store, &provider)
            .verify_reader(&mut std::io::Cursor::new(module));

        assert!(result.has_signature);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Unknown public-key algorithm")
        );
        assert_eq!(provider.verify_calls(), 0);
        assert_eq!(provider.digest_calls(), 0);
    }

    #[test]
    fn test_hash_failure() {
        let store = store_with(&[SIGNER_A_CERT_PEM]);
        let provider = ScriptedProvider::sequence([true]).failing_digest();
        let result = Verifier::with_provider(&store, &provider)
            .verify_reader(&mut std::io::Cursor::new(s2_module()));
        assert_eq!(
            result.error_message.as_deref(),
            Some("Failed to calculate module hash")
        );
        assert_eq!(provider.verify_calls(), 0);
    }
}

mod config {
    use super::*;

    #[test]
    fn test_config_builds_store() -> TestResult {
        let certs = cert_dir(&[("phoenixguard.pem", SIGNER_B_CERT_PEM)]);
        let extra = write_file(certs.path(), "extra.der", SIGNER_A_CERT_DER);
        let json = format!(
            r#"{{ "cert_dirs": [{:?}], "cert_files": [{:?}], "read_chunk_size": 16384 }}"#,
            certs.path(),
            extra
        );
        let config_path = write_file(certs.path(), "verifier.json", json.as_bytes());

        let config = VerifierConfig::from_json_file(&config_path)?;
        assert_eq!(config.read_chunk_size, 16384);

        let provider = config.provider();
        let store = config.build_store(&provider);
        let fingerprints: Vec<&str> = store.iter().map(|c| c.fingerprint()).collect();
        assert_eq!(fingerprints, vec![SIGNER_B_FINGERPRINT, SIGNER_A_FINGERPRINT]);

        let (_dir, path) = module_file(&s2_module());
        let result = Verifier::with_provider(&store, &provider).verify_path(&path);
        assert!(result.valid);
        assert_eq!(result.signer.as_deref(), Some(SIGNER_A_FINGERPRINT));
        Ok(())
    }
}
