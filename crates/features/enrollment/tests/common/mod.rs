#![allow(dead_code, unreachable_pub)]

use chrono::Utc;
use parking_lot::Mutex;
use registrar_domain::{Course, Record, Registration, Student};
use registrar_enrollment::RegistrationEngine;
use registrar_storage::{EntityStore, MemoryStore, StorageError};
use std::sync::Arc;

pub fn student(id: &str) -> Student {
    let now = Utc::now();
    Student {
        id: id.to_owned(),
        first_name: "Test".to_owned(),
        last_name: id.to_owned(),
        email: format!("{}@university.edu", id.to_lowercase()),
        username: id.to_lowercase(),
        password_hash: String::new(),
        major: "Computer Science".to_owned(),
        year: 2,
        gpa: 0.0,
        phone: None,
        address: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn course(id: &str, capacity: u32, schedule: Option<&str>) -> Course {
    let now = Utc::now();
    Course {
        id: id.to_owned(),
        code: format!("X{id}"),
        name: format!("Course {id}"),
        description: String::new(),
        credits: 3,
        department: "CS".to_owned(),
        instructor: "Dr. Smith".to_owned(),
        semester: "Fall".to_owned(),
        year: 2024,
        schedule: schedule.map(str::to_owned),
        location: "Room 101".to_owned(),
        capacity,
        enrolled: 0,
        prerequisites: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub async fn engine_with(
    students: &[&str],
    courses: &[Course],
) -> (RegistrationEngine<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    for id in students {
        store.put(&student(id)).await.unwrap();
    }
    for c in courses {
        store.put(c).await.unwrap();
    }
    (RegistrationEngine::with_store(store.clone()), store)
}

pub async fn enrolled_count<S: EntityStore>(store: &S, course_id: &str) -> u32 {
    store.get::<Course>(course_id).await.unwrap().unwrap().enrolled
}

pub async fn active_count<S: EntityStore>(store: &S, course_id: &str) -> usize {
    store
        .find_by_index::<Registration>("registration-by-course", course_id)
        .await
        .unwrap()
        .into_iter()
        .filter(Registration::is_active)
        .count()
}

#[derive(Debug, Default)]
struct Faults {
    put: Vec<&'static str>,
    delete: Vec<&'static str>,
    reads: bool,
}

/// [`MemoryStore`] with switchable failures per table and operation.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    faults: Arc<Mutex<Faults>>,
}

impl FlakyStore {
    pub fn fail_puts(&self, table: &'static str) {
        self.faults.lock().put.push(table);
    }

    pub fn fail_deletes(&self, table: &'static str) {
        self.faults.lock().delete.push(table);
    }

    pub fn fail_reads(&self) {
        self.faults.lock().reads = true;
    }

    pub fn heal(&self) {
        *self.faults.lock() = Faults::default();
    }

    fn read_fault(&self) -> Result<(), StorageError> {
        if self.faults.lock().reads { Err(injected("read")) } else { Ok(()) }
    }
}

fn injected(what: &str) -> StorageError {
    StorageError::Unavailable { message: format!("injected {what} failure").into(), context: None }
}

impl EntityStore for FlakyStore {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StorageError> {
        self.read_fault()?;
        self.inner.get(id).await
    }

    async fn put<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        if self.faults.lock().put.contains(&R::TABLE) {
            return Err(injected("put"));
        }
        self.inner.put(record).await
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<bool, StorageError> {
        if self.faults.lock().delete.contains(&R::TABLE) {
            return Err(injected("delete"));
        }
        self.inner.delete::<R>(id).await
    }

    async fn find_by_index<R: Record>(&self, index: &str, value: &str) -> Result<Vec<R>, StorageError> {
        self.read_fault()?;
        self.inner.find_by_index(index, value).await
    }

    async fn scan_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        self.read_fault()?;
        self.inner.scan_all().await
    }
}
