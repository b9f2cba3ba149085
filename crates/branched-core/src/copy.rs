//! User-facing strings shown next to the waitlist form.

pub const SUCCESS: &str = "You're on the list. Expect an invite soon.";
pub const INVALID_FORMAT: &str = "Please enter a valid email address.";
pub const ALREADY_REGISTERED: &str = "You're already on the list.";
pub const TRY_AGAIN: &str = "Something went wrong. Please try again.";
pub const TAGLINE: &str = "Limited early access spots available for Q2 2026.";
pub const PLACEHOLDER: &str = "name@work.com";
