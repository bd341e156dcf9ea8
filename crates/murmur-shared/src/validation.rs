//! Client-side sign-up form validation.

/// Check that an email has the `local@domain.tld` shape.
///
/// Mirrors the permissive check the mobile client applies before hitting the
/// account backend: no whitespace, a single `@`, and a dot with characters on
/// both sides in the domain part.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Per-rule outcome of the password policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    /// At least 8 characters.
    pub long_enough: bool,
    /// At least one ASCII uppercase letter.
    pub has_uppercase: bool,
    /// At least one ASCII digit.
    pub has_digit: bool,
}

impl PasswordCheck {
    pub fn of(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= 8,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.long_enough && self.has_uppercase && self.has_digit
    }

    /// Unmet rules in display order, for building the form error message.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.long_enough {
            failures.push("at least 8 characters");
        }
        if !self.has_uppercase {
            failures.push("one capital letter");
        }
        if !self.has_digit {
            failures.push("one number");
        }
        failures
    }
}
