use crate::copy;
use crate::domain::{normalize_email, WaitlistEmail};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;
use tracing::{debug, info, warn};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure reported by a [`WaitlistStorage`] backend.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct StorageError {
    context: String,
    #[source]
    source: BoxError,
}

impl StorageError {
    pub fn new(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Result of [`WaitlistStorage::add_email`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The address was already stored; nothing was written.
    AlreadyPresent,
}

/// Where registered addresses live. Both calls may block on I/O.
pub trait WaitlistStorage {
    fn list_emails(&self) -> Result<Vec<String>, StorageError>;
    /// Records `email` unless an equal address is already stored.
    fn add_email(&self, email: &WaitlistEmail) -> Result<AddOutcome, StorageError>;
}

impl<T: WaitlistStorage + ?Sized> WaitlistStorage for &T {
    fn list_emails(&self) -> Result<Vec<String>, StorageError> {
        (**self).list_emails()
    }

    fn add_email(&self, email: &WaitlistEmail) -> Result<AddOutcome, StorageError> {
        (**self).add_email(email)
    }
}

impl<T: WaitlistStorage + ?Sized> WaitlistStorage for Box<T> {
    fn list_emails(&self) -> Result<Vec<String>, StorageError> {
        (**self).list_emails()
    }

    fn add_email(&self, email: &WaitlistEmail) -> Result<AddOutcome, StorageError> {
        (**self).add_email(email)
    }
}

/// What to do when the duplicate lookup itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupPolicy {
    #[default]
    FailClosed,
    /// Treat the address as unregistered and go on to the write.
    FailOpen,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidFormat(#[from] CoreError),
    #[error("already registered: {0}")]
    AlreadyRegistered(String),
    #[error(transparent)]
    Persistence(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitErrorKind {
    InvalidFormat,
    AlreadyRegistered,
    Persistence,
}

impl SubmitError {
    pub fn kind(&self) -> SubmitErrorKind {
        match self {
            SubmitError::InvalidFormat(_) => SubmitErrorKind::InvalidFormat,
            SubmitError::AlreadyRegistered(_) => SubmitErrorKind::AlreadyRegistered,
            SubmitError::Persistence(_) => SubmitErrorKind::Persistence,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            SubmitErrorKind::InvalidFormat => copy::INVALID_FORMAT,
            SubmitErrorKind::AlreadyRegistered => copy::ALREADY_REGISTERED,
            SubmitErrorKind::Persistence => copy::TRY_AGAIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: WaitlistEmail,
    pub message: String,
}

pub struct Waitlist<S> {
    storage: S,
    policy: LookupPolicy,
    success_message: String,
}

impl<S: WaitlistStorage> Waitlist<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            policy: LookupPolicy::default(),
            success_message: copy::SUCCESS.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validates `raw`, rejects addresses already on the list, then records it.
    pub fn submit(&self, raw: &str) -> Result<Registration, SubmitError> {
        let email = WaitlistEmail::parse(raw)?;
        if self.lookup(&email)? {
            debug!(email = %email, "duplicate waitlist submission");
            return Err(SubmitError::AlreadyRegistered(email.into_string()));
        }
        if self.storage.add_email(&email)? == AddOutcome::AlreadyPresent {
            debug!(email = %email, "address appeared before the write");
            return Err(SubmitError::AlreadyRegistered(email.into_string()));
        }
        info!(email = %email, "registered on waitlist");
        Ok(Registration {
            email,
            message: self.success_message.clone(),
        })
    }

    pub fn contains(&self, raw: &str) -> Result<bool, SubmitError> {
        let email = WaitlistEmail::parse(raw)?;
        self.lookup(&email)
    }

    /// Registered addresses, normalized, deduplicated and sorted.
    pub fn registered(&self) -> Result<Vec<String>, SubmitError> {
        let mut emails: Vec<String> = self
            .storage
            .list_emails()?
            .iter()
            .filter_map(|value| normalize_email(value))
            .collect();
        emails.sort();
        emails.dedup();
        Ok(emails)
    }

    fn lookup(&self, email: &WaitlistEmail) -> Result<bool, SubmitError> {
        match self.storage.list_emails() {
            Ok(existing) => Ok(existing
                .iter()
                .any(|value| normalize_email(value).as_deref() == Some(email.as_str()))),
            Err(err) => match self.policy {
                LookupPolicy::FailClosed => Err(err.into()),
                LookupPolicy::FailOpen => {
                    warn!(
                        context = err.context(),
                        error = %err,
                        "waitlist lookup failed, treating address as new"
                    );
                    Ok(false)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AddOutcome, LookupPolicy, StorageError, SubmitError, SubmitErrorKind, Waitlist,
        WaitlistStorage,
    };
    use crate::copy;
    use crate::domain::WaitlistEmail;
    use std::cell::{Cell, RefCell};
    use std::io;

    #[derive(Default)]
    struct FakeStorage {
        emails: RefCell<Vec<String>>,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
    }

    impl FakeStorage {
        fn with(emails: &[&str]) -> Self {
            let storage = Self::default();
            storage
                .emails
                .borrow_mut()
                .extend(emails.iter().map(|value| value.to_string()));
            storage
        }

        fn snapshot(&self) -> Vec<String> {
            self.emails.borrow().clone()
        }
    }

    impl WaitlistStorage for FakeStorage {
        fn list_emails(&self) -> Result<Vec<String>, StorageError> {
            if self.fail_reads.get() {
                return Err(StorageError::new(
                    "read waitlist",
                    io::Error::other("offline"),
                ));
            }
            Ok(self.snapshot())
        }

        fn add_email(&self, email: &WaitlistEmail) -> Result<AddOutcome, StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::new(
                    "write waitlist",
                    io::Error::other("disk full"),
                ));
            }
            let mut emails = self.emails.borrow_mut();
            if emails.iter().any(|value| value == email.as_str()) {
                return Ok(AddOutcome::AlreadyPresent);
            }
            emails.push(email.as_str().to_string());
            Ok(AddOutcome::Added)
        }
    }

    #[test]
    fn submit_registers_new_address_once() {
        let waitlist = Waitlist::new(FakeStorage::default());
        let registration = waitlist.submit("a@b.com").expect("submit");
        assert_eq!(registration.email.as_str(), "a@b.com");
        assert_eq!(registration.message, copy::SUCCESS);
        assert_eq!(waitlist.storage().snapshot(), vec!["a@b.com".to_string()]);
    }

    #[test]
    fn submit_rejects_malformed_without_touching_storage() {
        let waitlist = Waitlist::new(FakeStorage::with(&["x@y.io"]));
        for raw in ["not-an-email", "a@b", "@b.com", "a@.com", "", "   "] {
            let err = waitlist.submit(raw).unwrap_err();
            assert_eq!(err.kind(), SubmitErrorKind::InvalidFormat, "input {raw:?}");
        }
        assert_eq!(waitlist.storage().snapshot(), vec!["x@y.io".to_string()]);
    }

    #[test]
    fn submit_scenario_rejects_case_insensitive_duplicate() {
        let waitlist = Waitlist::new(FakeStorage::default());
        assert!(matches!(
            waitlist.submit("not-an-email"),
            Err(SubmitError::InvalidFormat(_))
        ));
        waitlist.submit("a@b.com").expect("first submit");
        let err = waitlist.submit("A@B.COM").unwrap_err();
        assert!(matches!(err, SubmitError::AlreadyRegistered(ref email) if email == "a@b.com"));
        assert_eq!(err.user_message(), copy::ALREADY_REGISTERED);
        assert_eq!(waitlist.storage().snapshot(), vec!["a@b.com".to_string()]);
    }

    #[test]
    fn submit_matches_unnormalized_stored_entries() {
        let waitlist = Waitlist::new(FakeStorage::with(&[" Grace@Example.com "]));
        let err = waitlist.submit("grace@example.com").unwrap_err();
        assert_eq!(err.kind(), SubmitErrorKind::AlreadyRegistered);
    }

    #[test]
    fn lookup_failure_fails_closed_by_default() {
        let storage = FakeStorage::default();
        storage.fail_reads.set(true);
        let waitlist = Waitlist::new(storage);
        let err = waitlist.submit("a@b.com").unwrap_err();
        assert_eq!(err.kind(), SubmitErrorKind::Persistence);
        assert_eq!(err.user_message(), copy::TRY_AGAIN);
        assert!(waitlist.storage().snapshot().is_empty());
    }

    #[test]
    fn lookup_failure_can_fail_open() {
        let storage = FakeStorage::default();
        storage.fail_reads.set(true);
        let waitlist = Waitlist::new(storage).with_policy(LookupPolicy::FailOpen);
        waitlist.submit("a@b.com").expect("fail open submit");
        assert_eq!(waitlist.storage().snapshot(), vec!["a@b.com".to_string()]);
    }

    #[test]
    fn fail_open_still_rejects_address_found_at_write() {
        let storage = FakeStorage::with(&["a@b.com"]);
        storage.fail_reads.set(true);
        let waitlist = Waitlist::new(storage).with_policy(LookupPolicy::FailOpen);
        let err = waitlist.submit("A@B.COM").unwrap_err();
        assert_eq!(err.kind(), SubmitErrorKind::AlreadyRegistered);
        assert_eq!(waitlist.storage().snapshot(), vec!["a@b.com".to_string()]);
    }

    #[test]
    fn write_failure_is_persistence_error() {
        let storage = FakeStorage::default();
        storage.fail_writes.set(true);
        let waitlist = Waitlist::new(storage);
        let err = waitlist.submit("a@b.com").unwrap_err();
        assert_eq!(err.kind(), SubmitErrorKind::Persistence);
        let SubmitError::Persistence(source) = &err else {
            panic!("expected persistence error, got {err:?}");
        };
        assert_eq!(source.context(), "write waitlist");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn custom_success_message_is_returned() {
        let waitlist = Waitlist::new(FakeStorage::default()).with_success_message("See you soon.");
        let registration = waitlist.submit("a@b.com").expect("submit");
        assert_eq!(registration.message, "See you soon.");
    }

    #[test]
    fn registered_is_sorted_and_deduplicated() {
        let waitlist = Waitlist::new(FakeStorage::with(&["b@x.io", "A@x.io", "a@x.io"]));
        let emails = waitlist.registered().expect("registered");
        assert_eq!(emails, vec!["a@x.io".to_string(), "b@x.io".to_string()]);
    }

    #[test]
    fn contains_uses_normalized_form() {
        let waitlist = Waitlist::new(FakeStorage::with(&["a@b.com"]));
        assert!(waitlist.contains(" A@b.Com ").expect("contains"));
        assert!(!waitlist.contains("c@b.com").expect("contains"));
    }
}
