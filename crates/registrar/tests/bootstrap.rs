use registrar::Registrar;
use registrar::domain::config::{CompressionKind, ConflictPolicy, RegistrarConfig, StorageBackend};
use registrar::domain::{Course, Record};
use registrar::features::catalog::NewCourse;
use registrar::features::identity::NewStudent;
use registrar::storage::EntityStore;

fn file_config(dir: &std::path::Path, compression: CompressionKind) -> RegistrarConfig {
    let mut cfg = RegistrarConfig::default();
    cfg.storage.backend = StorageBackend::File;
    cfg.storage.data_dir = dir.to_path_buf();
    cfg.storage.compression = compression;
    cfg.security.hash_iterations = 1;
    cfg
}

fn ada() -> NewStudent {
    NewStudent {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@university.edu".to_owned(),
        username: "ada".to_owned(),
        password: "password123".to_owned(),
        major: "Mathematics".to_owned(),
        year: 1,
        ..NewStudent::default()
    }
}

fn algebra(capacity: u32) -> NewCourse {
    NewCourse {
        code: "MATH101".to_owned(),
        name: "Algebra".to_owned(),
        department: "MATH".to_owned(),
        schedule: Some("MWF 09:00-10:00".to_owned()),
        capacity,
        ..NewCourse::default()
    }
}

#[tokio::test]
async fn memory_backend_wires_all_services() {
    let mut cfg = RegistrarConfig::default();
    cfg.storage.backend = StorageBackend::Memory;
    cfg.security.hash_iterations = 1;
    let registrar = Registrar::builder().config(cfg).build().await.unwrap();
    assert_eq!(registrar.store().backend(), "memory");

    let student = registrar.accounts().create_student(ada()).await.unwrap();
    let course = registrar.catalog().create_course(algebra(10)).await.unwrap();
    registrar.engine().enroll(&student.id, &course.id).await.unwrap();

    assert!(registrar.accounts().authenticate("ada", "password123").await.unwrap());
    assert_eq!(registrar.catalog().find_by_code("MATH101").await.unwrap().unwrap().enrolled, 1);
}

#[tokio::test]
async fn file_backend_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();

    for compression in [CompressionKind::None, CompressionKind::Lz4] {
        let root = dir.path().join(compression.to_string());
        let first = Registrar::builder().config(file_config(&root, compression)).build().await.unwrap();
        assert_eq!(first.store().backend(), "file");
        let student = first.accounts().create_student(ada()).await.unwrap();
        let course = first.catalog().create_course(algebra(10)).await.unwrap();
        first.engine().enroll(&student.id, &course.id).await.unwrap();
        drop(first);

        let second = Registrar::builder().config(file_config(&root, compression)).build().await.unwrap();
        let courses = second.engine().student_courses(&student.id).await;
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].enrolled, 1);
        assert!(second.accounts().authenticate("ada", "password123").await.unwrap());
    }
}

#[tokio::test]
async fn start_up_reconciliation_repairs_counters() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = file_config(dir.path(), CompressionKind::None);

    let registrar = Registrar::builder().config(cfg.clone()).build().await.unwrap();
    let student = registrar.accounts().create_student(ada()).await.unwrap();
    let course = registrar.catalog().create_course(algebra(10)).await.unwrap();
    registrar.engine().enroll(&student.id, &course.id).await.unwrap();

    // Simulate a crash between the two writes of an enroll.
    let mut stale: Course = registrar.store().get(&course.id).await.unwrap().unwrap();
    stale.enrolled = 0;
    registrar.store().put(&stale).await.unwrap();
    drop(registrar);

    let mut no_repair = cfg.clone();
    no_repair.enrollment.reconcile_on_start = false;
    let untouched = Registrar::builder().config(no_repair).build().await.unwrap();
    let stored: Course = untouched.store().get(&course.id).await.unwrap().unwrap();
    assert_eq!(stored.enrolled, 0);
    drop(untouched);

    let repaired = Registrar::builder().config(cfg).build().await.unwrap();
    let stored: Course = repaired.store().get(course.id()).await.unwrap().unwrap();
    assert_eq!(stored.enrolled, 1);
}

#[tokio::test]
async fn conflict_policy_comes_from_config() {
    let mut cfg = RegistrarConfig::default();
    cfg.storage.backend = StorageBackend::Memory;
    cfg.security.hash_iterations = 1;
    cfg.enrollment.conflict_policy = ConflictPolicy::Literal;
    let registrar = Registrar::builder().config(cfg).build().await.unwrap();

    let student = registrar.accounts().create_student(ada()).await.unwrap();
    let first = registrar.catalog().create_course(algebra(10)).await.unwrap();
    let shifted = registrar
        .catalog()
        .create_course(NewCourse {
            code: "MATH102".to_owned(),
            schedule: Some("MWF 09:30-10:30".to_owned()),
            ..algebra(10)
        })
        .await
        .unwrap();

    registrar.engine().enroll(&student.id, &first.id).await.unwrap();
    registrar.engine().enroll(&student.id, &shifted.id).await.unwrap();
}

#[tokio::test]
async fn unusable_data_dir_fails_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let err = Registrar::builder()
        .config(file_config(&blocker, CompressionKind::None))
        .build()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "Storage");
}
