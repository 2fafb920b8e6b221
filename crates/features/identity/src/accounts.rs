use crate::credentials::{CredentialHasher, BcryptCredentials};
use crate::error::{IdentityError, IdentityErrorExt};
use registrar_domain::{Student, index};
use registrar_kernel::{Clock, SystemClock, safe_nanoid};
use registrar_storage::EntityStore;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Input for [`StudentAccounts::create_student`]. The password is hashed and dropped.
#[derive(Clone, Default)]
pub struct NewStudent {
    /// Fixed id, e.g. for imported data. A fresh id is generated when `None`.
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub major: String,
    pub year: u8,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl std::fmt::Debug for NewStudent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewStudent")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct AccountsInner<S> {
    store: S,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
    /// Serializes writes so username/email uniqueness checks cannot interleave.
    writes: Mutex<()>,
}

/// Student account service: registration, lookup, and authentication.
#[derive(Debug)]
pub struct StudentAccounts<S> {
    inner: Arc<AccountsInner<S>>,
}

impl<S> Clone for StudentAccounts<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> Deref for StudentAccounts<S> {
    type Target = AccountsInner<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: EntityStore> StudentAccounts<S> {
    pub fn new(store: S, hasher: Arc<dyn CredentialHasher>, clock: Arc<dyn Clock>) -> Self {
        Self { inner: Arc::new(AccountsInner { store, hasher, clock, writes: Mutex::new(()) }) }
    }

    /// Default hashing cost and the system clock.
    pub fn with_store(store: S) -> Self {
        Self::new(store, Arc::new(BcryptCredentials::default()), Arc::new(SystemClock::new()))
    }

    /// Registers a new student.
    ///
    /// Uniqueness is checked username first, then email. GPA starts at `0.0`.
    ///
    /// # Errors
    /// [`IdentityError::InvalidInput`] for blank username, email or password,
    /// [`IdentityError::DuplicateUsername`], [`IdentityError::DuplicateEmail`], or a store failure.
    #[instrument(skip(self, draft), fields(username = %draft.username))]
    pub async fn create_student(&self, draft: NewStudent) -> Result<Student, IdentityError> {
        validate(&draft)?;
        let _guard = self.writes.lock().await;

        if self.find_by_username(&draft.username).await?.is_some() {
            return Err(IdentityError::DuplicateUsername {
                message: draft.username.into(),
                context: None,
            });
        }
        if self.find_by_email(&draft.email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail {
                message: draft.email.into(),
                context: None,
            });
        }

        let id = draft.id.unwrap_or_else(|| safe_nanoid!());
        if self.store.get::<Student>(&id).await?.is_some() {
            return Err(IdentityError::InvalidInput {
                message: format!("id '{id}' already in use").into(),
                context: None,
            });
        }

        let password_hash = self.hasher.hash(&draft.password)?;
        let now = self.clock.now();
        let student = Student {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            username: draft.username,
            password_hash,
            major: draft.major,
            year: draft.year,
            gpa: 0.0,
            phone: draft.phone,
            address: draft.address,
            created_at: now,
            updated_at: now,
        };

        self.store.put(&student).await.context("Saving student")?;
        info!(student_id = %student.id, "Student account created");
        Ok(student)
    }

    /// `Ok(false)` for unknown usernames and wrong passwords alike.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, IdentityError> {
        let Some(student) = self.find_by_username(username).await? else {
            debug!("Authentication failed: unknown user");
            return Ok(false);
        };

        let ok = self.hasher.verify(password, &student.password_hash);
        if ok {
            info!(student_id = %student.id, "Student authenticated");
        } else {
            debug!(student_id = %student.id, "Authentication failed: wrong password");
        }
        Ok(ok)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Student>, IdentityError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Student>, IdentityError> {
        self.find_unique(index::STUDENT_BY_USERNAME, username).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Student>, IdentityError> {
        self.find_unique(index::STUDENT_BY_EMAIL, email).await
    }

    /// Resolves a username, falling back to a student id.
    pub async fn lookup(&self, username_or_id: &str) -> Result<Option<Student>, IdentityError> {
        match self.find_by_username(username_or_id).await? {
            Some(student) => Ok(Some(student)),
            None => self.find_by_id(username_or_id).await,
        }
    }

    pub async fn list(&self) -> Result<Vec<Student>, IdentityError> {
        Ok(self.store.scan_all().await?)
    }

    /// Replaces a stored student and refreshes `updated_at`.
    ///
    /// # Errors
    /// [`IdentityError::NotFound`] for an unknown id, or a duplicate error when the new
    /// username or email belongs to someone else.
    #[instrument(skip(self, student), fields(student_id = %student.id))]
    pub async fn update(&self, mut student: Student) -> Result<Student, IdentityError> {
        let _guard = self.writes.lock().await;

        let Some(existing) = self.find_by_id(&student.id).await? else {
            return Err(IdentityError::NotFound { message: student.id.into(), context: None });
        };

        if existing.username != student.username
            && self.find_by_username(&student.username).await?.is_some_and(|s| s.id != student.id)
        {
            return Err(IdentityError::DuplicateUsername {
                message: student.username.into(),
                context: None,
            });
        }
        if existing.email != student.email
            && self.find_by_email(&student.email).await?.is_some_and(|s| s.id != student.id)
        {
            return Err(IdentityError::DuplicateEmail {
                message: student.email.into(),
                context: None,
            });
        }

        student.created_at = existing.created_at;
        student.updated_at = self.clock.now();
        self.store.put(&student).await.context("Updating student")?;
        debug!("Student updated");
        Ok(student)
    }

    /// Returns whether the student existed. Registrations are left in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, IdentityError> {
        let _guard = self.writes.lock().await;
        let removed = self.store.delete::<Student>(id).await.context("Deleting student")?;
        if removed {
            info!(student_id = %id, "Student deleted");
        }
        Ok(removed)
    }

    async fn find_unique(&self, index: &str, value: &str) -> Result<Option<Student>, IdentityError> {
        let matches: Vec<Student> = self.store.find_by_index(index, value).await?;
        if matches.len() > 1 {
            tracing::warn!(index, value, count = matches.len(), "Unique index has several entries");
        }
        Ok(matches.into_iter().next())
    }
}

fn validate(draft: &NewStudent) -> Result<(), IdentityError> {
    let blank = [
        ("username", draft.username.as_str()),
        ("email", draft.email.as_str()),
        ("password", draft.password.as_str()),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    if let Some((field, _)) = blank {
        return Err(IdentityError::InvalidInput {
            message: format!("{field} must not be blank").into(),
            context: None,
        });
    }
    if !draft.email.contains('@') {
        return Err(IdentityError::InvalidInput {
            message: format!("'{}' is not an email address", draft.email).into(),
            context: None,
        });
    }
    Ok(())
}
