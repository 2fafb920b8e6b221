use registrar_domain::config::{ConflictPolicy, RegistrarConfig, StorageBackend};
use registrar_kernel::config::load_config;
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registrar.toml");
    fs::write(
        &path,
        r#"
[storage]
backend = "memory"
data_dir = "/var/lib/registrar"

[enrollment]
conflict_policy = "literal"
reconcile_on_start = false

[security]
hash_iterations = 50
"#,
    )
    .unwrap();

    let cfg: RegistrarConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from("/var/lib/registrar"));
    assert_eq!(cfg.enrollment.conflict_policy, ConflictPolicy::Literal);
    assert!(!cfg.enrollment.reconcile_on_start);
    assert_eq!(cfg.security.hash_iterations, 50);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let res = load_config::<RegistrarConfig>(Some(&missing));
    let err = res.unwrap_err();
    assert_eq!(err.kind(), "Config");
}

#[test]
fn malformed_values_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[storage]\nbackend = \"cassette\"\n").unwrap();

    assert!(load_config::<RegistrarConfig>(Some(&path)).is_err());
}
