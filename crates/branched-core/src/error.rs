use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("email is required")]
    EmptyEmail,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}
