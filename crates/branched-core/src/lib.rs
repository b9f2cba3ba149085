pub mod copy;
pub mod domain;
pub mod error;
pub mod form;
pub mod waitlist;

pub use domain::*;
pub use error::CoreError;
pub use form::{FormError, SubmissionStatus, WaitlistForm};
pub use waitlist::{
    AddOutcome, LookupPolicy, Registration, StorageError, SubmitError, SubmitErrorKind, Waitlist,
    WaitlistStorage,
};
