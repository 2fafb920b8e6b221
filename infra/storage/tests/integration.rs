use chrono::Utc;
use registrar_domain::{Course, Registration, RegistrationStatus, index};
use registrar_storage::*;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn course(id: &str, code: &str, department: &str) -> Course {
    let now = Utc::now();
    Course {
        id: id.to_owned(),
        code: code.to_owned(),
        name: format!("{code} section"),
        description: String::new(),
        credits: 3,
        department: department.to_owned(),
        instructor: "Dr. Smith".to_owned(),
        semester: "Fall".to_owned(),
        year: 2024,
        schedule: Some("MWF 09:00-10:00".to_owned()),
        location: "Room 101".to_owned(),
        capacity: 30,
        enrolled: 0,
        prerequisites: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn registration(id: &str, student: &str, course: &str) -> Registration {
    Registration {
        id: id.to_owned(),
        student_id: student.to_owned(),
        course_id: course.to_owned(),
        status: RegistrationStatus::Enrolled,
        grade: None,
        registered_at: Utc::now(),
        dropped_at: None,
    }
}

async fn file_store(temp: &TempDir, compression: Compression) -> FileStore {
    FileStore::builder().root(temp.path().join("data")).compression(compression).open().await.unwrap()
}

/// Behaviour every adapter must share.
async fn exercise_contract<S: EntityStore>(store: S) {
    assert!(store.get::<Course>("C001").await.unwrap().is_none());
    assert!(store.scan_all::<Course>().await.unwrap().is_empty());

    store.put(&course("C002", "MATH201", "MATH")).await.unwrap();
    store.put(&course("C001", "CS101", "CS")).await.unwrap();
    store.put(&course("C003", "CS201", "CS")).await.unwrap();

    let fetched: Course = store.get("C001").await.unwrap().unwrap();
    assert_eq!(fetched.code, "CS101");

    let ids: Vec<String> = store.scan_all::<Course>().await.unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, ["C001", "C002", "C003"]);

    let cs: Vec<Course> = store.find_by_index(index::COURSE_BY_DEPARTMENT, "CS").await.unwrap();
    assert_eq!(cs.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), ["C001", "C003"]);

    // Replacing a record moves its index entries.
    let mut moved = course("C003", "CS201", "EE");
    moved.enrolled = 7;
    store.put(&moved).await.unwrap();
    let cs: Vec<Course> = store.find_by_index(index::COURSE_BY_DEPARTMENT, "CS").await.unwrap();
    assert_eq!(cs.len(), 1);
    let ee: Vec<Course> = store.find_by_index(index::COURSE_BY_DEPARTMENT, "EE").await.unwrap();
    assert_eq!(ee[0].enrolled, 7);

    // Tables are isolated even when ids collide.
    store.put(&registration("C001", "S001", "C002")).await.unwrap();
    let by_student: Vec<Registration> =
        store.find_by_index(index::REGISTRATION_BY_STUDENT, "S001").await.unwrap();
    assert_eq!(by_student.len(), 1);
    assert_eq!(store.get::<Course>("C001").await.unwrap().unwrap().code, "CS101");

    assert!(store.delete::<Course>("C001").await.unwrap());
    assert!(!store.delete::<Course>("C001").await.unwrap());
    assert!(store.get::<Course>("C001").await.unwrap().is_none());
    assert!(store.find_by_index::<Course>(index::COURSE_BY_CODE, "CS101").await.unwrap().is_empty());
    assert!(store.get::<Registration>("C001").await.unwrap().is_some());

    assert!(store.find_by_index::<Course>("no-such-index", "CS").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_store_contract() {
    exercise_contract(MemoryStore::new()).await;
}

#[tokio::test]
async fn test_file_store_contract_uncompressed() {
    let temp = TempDir::new().unwrap();
    exercise_contract(file_store(&temp, Compression::None).await).await;
}

#[tokio::test]
async fn test_file_store_contract_compressed() {
    let temp = TempDir::new().unwrap();
    exercise_contract(file_store(&temp, Compression::Lz4).await).await;
}

#[tokio::test]
async fn test_any_store_delegates() {
    let store = AnyStore::from(MemoryStore::new());
    assert_eq!(store.backend(), "memory");
    exercise_contract(store).await;

    let temp = TempDir::new().unwrap();
    let store = AnyStore::from(file_store(&temp, Compression::None).await);
    assert_eq!(store.backend(), "file");
    exercise_contract(store).await;
}

#[tokio::test]
async fn test_invalid_keys_rejected_on_write_and_absent_on_read() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp, Compression::None).await;

    let err = store.put(&course("../escape", "X1", "CS")).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidKey");
    assert!(store.get::<Course>("../escape").await.unwrap().is_none());
    assert!(!store.delete::<Course>("a/b").await.unwrap());

    let err = MemoryStore::new().put(&course("", "X1", "CS")).await.unwrap_err();
    assert_eq!(err.kind(), "InvalidKey");
}

#[tokio::test]
async fn test_records_are_sharded_on_disk() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp, Compression::None).await;

    store.put(&course("C001", "CS101", "CS")).await.unwrap();
    assert!(store.root().join("courses/C0/01/C001.rec").is_file());
}

#[tokio::test]
async fn test_indexes_rebuilt_after_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let store = file_store(&temp, Compression::Lz4).await;
        store.put(&course("C001", "CS101", "CS")).await.unwrap();
        store.put(&course("C002", "CS102", "CS")).await.unwrap();
    }

    let store = file_store(&temp, Compression::Lz4).await;
    let found: Vec<Course> = store.find_by_index(index::COURSE_BY_CODE, "CS102").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "C002");
}

#[tokio::test]
async fn test_stale_temp_files_purged_on_open() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp, Compression::None).await;
    store.put(&course("C001", "CS101", "CS")).await.unwrap();

    let shard = store.root().join("courses/C0/01");
    let stale = shard.join("C001.rec.regtmp.99");
    let fresh = shard.join("C001.rec.regtmp.100");
    std::fs::write(&stale, b"partial").unwrap();
    std::fs::write(&fresh, b"partial").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&stale)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    drop(store);

    let store = file_store(&temp, Compression::None).await;
    assert!(!stale.exists());
    assert!(fresh.exists(), "in-flight temp files are left alone");

    // Temp files never surface as records.
    assert_eq!(store.scan_all::<Course>().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_puts_on_distinct_keys() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp, Compression::None).await;

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store.put(&registration(&format!("R{i:03}"), "S001", "C001")).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let regs: Vec<Registration> =
        store.find_by_index(index::REGISTRATION_BY_COURSE, "C001").await.unwrap();
    assert_eq!(regs.len(), 32);
    assert_eq!(regs.first().map(|r| r.id.as_str()), Some("R000"));
}

#[tokio::test]
async fn test_open_without_create_requires_existing_root() {
    let temp = TempDir::new().unwrap();
    let err = FileStore::builder().root(temp.path().join("missing")).create(false).open().await.unwrap_err();
    assert_eq!(err.kind(), "Io");
}
