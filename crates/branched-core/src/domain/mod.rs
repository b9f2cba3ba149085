pub mod email;

pub use email::{is_valid_email, normalize_email, WaitlistEmail};
