use crate::waitlist::{Registration, SubmitError, Waitlist, WaitlistStorage};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Status shown next to the waitlist input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Loading => "loading",
            SubmissionStatus::Success { .. } => "success",
            SubmissionStatus::Error { .. } => "error",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Success { message } | SubmissionStatus::Error { message } => {
                Some(message)
            }
            SubmissionStatus::Idle | SubmissionStatus::Loading => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the form has already been submitted")]
    Completed,
    #[error("input is locked while {0}")]
    Locked(&'static str),
    #[error("no submission in flight")]
    NotLoading,
}

/// One waitlist form instance: an input buffer plus its submission status.
///
/// At most one submission is in flight at a time, and `Success` is final.
#[derive(Debug, Default)]
pub struct WaitlistForm {
    input: String,
    status: SubmissionStatus,
}

impl WaitlistForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, SubmissionStatus::Success { .. })
    }

    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), FormError> {
        match self.status {
            SubmissionStatus::Loading | SubmissionStatus::Success { .. } => {
                Err(FormError::Locked(self.status.label()))
            }
            SubmissionStatus::Error { .. } => {
                self.input = text.into();
                self.status = SubmissionStatus::Idle;
                Ok(())
            }
            SubmissionStatus::Idle => {
                self.input = text.into();
                Ok(())
            }
        }
    }

    /// Moves to `Loading` and hands back the address to send. Empty input is ignored.
    pub fn begin_submit(&mut self) -> Result<Option<String>, FormError> {
        match self.status {
            SubmissionStatus::Loading => return Err(FormError::InFlight),
            SubmissionStatus::Success { .. } => return Err(FormError::Completed),
            SubmissionStatus::Idle | SubmissionStatus::Error { .. } => {}
        }
        if self.input.is_empty() {
            return Ok(None);
        }
        self.status = SubmissionStatus::Loading;
        Ok(Some(self.input.clone()))
    }

    pub fn finish(
        &mut self,
        result: Result<Registration, SubmitError>,
    ) -> Result<&SubmissionStatus, FormError> {
        if self.status != SubmissionStatus::Loading {
            return Err(FormError::NotLoading);
        }
        self.status = match result {
            Ok(registration) => {
                self.input.clear();
                SubmissionStatus::Success {
                    message: registration.message,
                }
            }
            Err(err) => {
                debug!(error = %err, kind = ?err.kind(), "waitlist submission rejected");
                SubmissionStatus::Error {
                    message: err.user_message().to_string(),
                }
            }
        };
        Ok(&self.status)
    }

    pub fn submit<S: WaitlistStorage>(
        &mut self,
        waitlist: &Waitlist<S>,
    ) -> Result<&SubmissionStatus, FormError> {
        let Some(email) = self.begin_submit()? else {
            return Ok(&self.status);
        };
        let result = waitlist.submit(&email);
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormError, SubmissionStatus, WaitlistForm};
    use crate::copy;
    use crate::domain::WaitlistEmail;
    use crate::waitlist::{AddOutcome, Registration, StorageError, Waitlist, WaitlistStorage};
    use std::cell::RefCell;

    #[derive(Default)]
    struct VecStorage(RefCell<Vec<String>>);

    impl WaitlistStorage for VecStorage {
        fn list_emails(&self) -> Result<Vec<String>, StorageError> {
            Ok(self.0.borrow().clone())
        }

        fn add_email(&self, email: &WaitlistEmail) -> Result<AddOutcome, StorageError> {
            self.0.borrow_mut().push(email.as_str().to_string());
            Ok(AddOutcome::Added)
        }
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: WaitlistEmail::parse(email).unwrap(),
            message: copy::SUCCESS.to_string(),
        }
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut form = WaitlistForm::new();
        assert_eq!(form.begin_submit(), Ok(None));
        assert_eq!(form.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn second_submit_while_loading_is_rejected() {
        let mut form = WaitlistForm::new();
        form.edit("a@b.com").unwrap();
        assert_eq!(form.begin_submit(), Ok(Some("a@b.com".to_string())));
        assert_eq!(form.status(), &SubmissionStatus::Loading);
        assert_eq!(form.begin_submit(), Err(FormError::InFlight));
        assert_eq!(form.edit("c@d.com"), Err(FormError::Locked("loading")));
    }

    #[test]
    fn success_clears_input_and_is_terminal() {
        let mut form = WaitlistForm::new();
        form.edit("a@b.com").unwrap();
        form.begin_submit().unwrap();
        let status = form.finish(Ok(registration("a@b.com"))).unwrap();
        assert_eq!(status.message(), Some(copy::SUCCESS));
        assert_eq!(form.input(), "");
        assert!(form.is_complete());
        assert_eq!(form.begin_submit(), Err(FormError::Completed));
        assert_eq!(form.edit("x@y.z"), Err(FormError::Locked("success")));
    }

    #[test]
    fn finish_outside_loading_is_rejected() {
        let mut form = WaitlistForm::new();
        assert_eq!(
            form.finish(Ok(registration("a@b.com"))).unwrap_err(),
            FormError::NotLoading
        );
    }

    #[test]
    fn error_resets_to_idle_on_edit() {
        let waitlist = Waitlist::new(VecStorage::default());
        let mut form = WaitlistForm::new();
        form.edit("not-an-email").unwrap();
        let status = form.submit(&waitlist).unwrap();
        assert_eq!(
            status,
            &SubmissionStatus::Error {
                message: copy::INVALID_FORMAT.to_string()
            }
        );
        assert_eq!(form.input(), "not-an-email");

        form.edit("a@b.com").unwrap();
        assert_eq!(form.status(), &SubmissionStatus::Idle);
        let status = form.submit(&waitlist).unwrap();
        assert_eq!(status.label(), "success");
    }

    #[test]
    fn duplicate_submission_reports_already_registered() {
        let waitlist = Waitlist::new(VecStorage::default());
        waitlist.submit("a@b.com").unwrap();

        let mut form = WaitlistForm::new();
        form.edit("A@B.COM").unwrap();
        let status = form.submit(&waitlist).unwrap();
        assert_eq!(status.message(), Some(copy::ALREADY_REGISTERED));
        assert_eq!(waitlist.storage().0.borrow().len(), 1);
    }
}
