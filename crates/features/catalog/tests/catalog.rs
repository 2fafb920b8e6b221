use chrono::Utc;
use registrar_catalog::*;
use registrar_domain::{Course, Record, Registration, RegistrationStatus};
use registrar_storage::{EntityStore, MemoryStore, StorageError};

fn draft(code: &str, department: &str, capacity: u32) -> NewCourse {
    NewCourse {
        code: code.to_owned(),
        name: format!("{code} Lecture"),
        credits: 3,
        department: department.to_owned(),
        instructor: "Dr. Brown".to_owned(),
        semester: "Fall".to_owned(),
        year: 2024,
        schedule: Some("TTh 10:00-11:30".to_owned()),
        location: "Room 301".to_owned(),
        capacity,
        ..NewCourse::default()
    }
}

async fn seeded() -> CourseCatalog<MemoryStore> {
    let catalog = CourseCatalog::with_store(MemoryStore::new());
    catalog
        .create_course(NewCourse { name: "Introduction to Computer Science".to_owned(), ..draft("CS101", "CS", 30) })
        .await
        .unwrap();
    catalog.create_course(NewCourse { instructor: "Dr. Taylor".to_owned(), ..draft("MATH201", "MATH", 1) }).await.unwrap();
    catalog.create_course(draft("CS201", "CS", 25)).await.unwrap();
    catalog
}

#[tokio::test]
async fn create_rejects_blank_code_zero_capacity_and_duplicates() {
    let catalog = seeded().await;

    assert_eq!(catalog.create_course(draft("  ", "CS", 10)).await.unwrap_err().kind(), "InvalidCourse");
    assert_eq!(catalog.create_course(draft("CS999", "CS", 0)).await.unwrap_err().kind(), "InvalidCourse");
    assert_eq!(catalog.create_course(draft("CS101", "CS", 10)).await.unwrap_err().kind(), "DuplicateCode");
    assert_eq!(catalog.list().await.len(), 3);
}

#[tokio::test]
async fn unparseable_schedule_is_kept_verbatim() {
    let catalog = CourseCatalog::with_store(MemoryStore::new());
    let course = catalog
        .create_course(NewCourse { schedule: Some("TBA".to_owned()), ..draft("ART100", "ART", 12) })
        .await
        .unwrap();
    assert_eq!(course.schedule.as_deref(), Some("TBA"));
    assert_eq!(course.enrolled, 0);
}

#[tokio::test]
async fn lookups_by_code_and_department() {
    let catalog = seeded().await;

    let cs101 = catalog.find_by_code("CS101").await.unwrap().unwrap();
    assert_eq!(catalog.find_by_id(&cs101.id).await.unwrap().unwrap().code, "CS101");
    assert!(catalog.find_by_code("CS404").await.unwrap().is_none());

    let mut cs: Vec<String> = catalog.find_by_department("CS").await.into_iter().map(|c| c.code).collect();
    cs.sort();
    assert_eq!(cs, ["CS101", "CS201"]);
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let catalog = seeded().await;

    let codes = |courses: Vec<Course>| {
        let mut codes: Vec<String> = courses.into_iter().map(|c| c.code).collect();
        codes.sort();
        codes
    };
    assert_eq!(codes(catalog.search("computer").await), ["CS101"]);
    assert_eq!(codes(catalog.search("taylor").await), ["MATH201"]);
    assert_eq!(codes(catalog.search("cs").await), ["CS101", "CS201"]);
    assert!(catalog.search("chemistry").await.is_empty());
}

#[tokio::test]
async fn update_keeps_engine_owned_counter() {
    let store = MemoryStore::new();
    let catalog = CourseCatalog::with_store(store.clone());
    let mut course = catalog.create_course(draft("CS101", "CS", 30)).await.unwrap();

    // Simulate the engine having filled two seats.
    course.enrolled = 2;
    store.put(&course).await.unwrap();

    let mut edit = course.clone();
    edit.enrolled = 0;
    edit.instructor = "Dr. Wilson".to_owned();
    let saved = catalog.update(edit).await.unwrap();
    assert_eq!(saved.enrolled, 2);
    assert_eq!(saved.instructor, "Dr. Wilson");
    assert!(saved.updated_at > course.updated_at);

    let mut shrink = saved.clone();
    shrink.capacity = 1;
    assert_eq!(catalog.update(shrink).await.unwrap_err().kind(), "InvalidCourse");

    let mut ghost = saved;
    ghost.id = "C404".to_owned();
    assert_eq!(catalog.update(ghost).await.unwrap_err().kind(), "NotFound");
}

#[tokio::test]
async fn available_excludes_full_courses() {
    let store = MemoryStore::new();
    let catalog = CourseCatalog::with_store(store.clone());
    let mut full = catalog.create_course(draft("MATH201", "MATH", 1)).await.unwrap();
    catalog.create_course(draft("CS101", "CS", 30)).await.unwrap();

    AvailabilityTracker::increment(&mut full).unwrap();
    store.put(&full).await.unwrap();

    let open: Vec<String> = catalog.available().await.into_iter().map(|c| c.code).collect();
    assert_eq!(open, ["CS101"]);
}

#[tokio::test]
async fn delete_refuses_courses_with_active_registrations() {
    let store = MemoryStore::new();
    let catalog = CourseCatalog::with_store(store.clone());
    let course = catalog.create_course(draft("CS101", "CS", 30)).await.unwrap();

    let mut registration = Registration {
        id: "R001".to_owned(),
        student_id: "S001".to_owned(),
        course_id: course.id.clone(),
        status: RegistrationStatus::Enrolled,
        grade: None,
        registered_at: Utc::now(),
        dropped_at: None,
    };
    store.put(&registration).await.unwrap();
    assert_eq!(catalog.delete(&course.id).await.unwrap_err().kind(), "CourseInUse");

    registration.status = RegistrationStatus::Dropped;
    store.put(&registration).await.unwrap();
    assert!(catalog.delete(&course.id).await.unwrap());
    assert!(!catalog.delete(&course.id).await.unwrap());
}

/// A store whose backend is permanently down.
#[derive(Debug, Clone)]
struct DownStore;

fn down() -> StorageError {
    StorageError::Unavailable { message: "backend offline".into(), context: None }
}

impl EntityStore for DownStore {
    async fn get<R: Record>(&self, _id: &str) -> Result<Option<R>, StorageError> {
        Err(down())
    }

    async fn put<R: Record>(&self, _record: &R) -> Result<(), StorageError> {
        Err(down())
    }

    async fn delete<R: Record>(&self, _id: &str) -> Result<bool, StorageError> {
        Err(down())
    }

    async fn find_by_index<R: Record>(&self, _index: &str, _value: &str) -> Result<Vec<R>, StorageError> {
        Err(down())
    }

    async fn scan_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        Err(down())
    }
}

#[tokio::test]
async fn listings_tolerate_store_failure_but_writes_do_not() {
    let catalog = CourseCatalog::with_store(DownStore);

    assert!(catalog.list().await.is_empty());
    assert!(catalog.available().await.is_empty());
    assert!(catalog.search("cs").await.is_empty());
    assert!(catalog.find_by_department("CS").await.is_empty());

    let err = catalog.create_course(draft("CS101", "CS", 30)).await.unwrap_err();
    assert_eq!(err.kind(), "Store");
    assert!(catalog.find_by_id("C001").await.is_err());
}
