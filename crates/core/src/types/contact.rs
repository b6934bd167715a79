//! Validated contact fields collected at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing contact fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The email is empty.
    #[error("email cannot be empty")]
    EmptyEmail,
    /// The email is too long.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The email is not `local@domain`.
    #[error("email must look like name@domain")]
    MalformedEmail,
    /// The phone number is not ten digits.
    #[error("phone number must be 10 digits")]
    InvalidPhone,
    /// The pincode is not a six digit postal code.
    #[error("pincode must be 6 digits and cannot start with 0")]
    InvalidPincode,
}

/// An email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Exactly one `@` with a non-empty local part and domain
///
/// ## Examples
///
/// ```
/// use slayk_core::Email;
///
/// assert!(Email::parse("asha@example.in").is_ok());
/// assert!(Email::parse("asha.example.in").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or not of
    /// the form `local@domain`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::EmptyEmail);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ContactError::EmailTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(ContactError::MalformedEmail),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ten digit Indian mobile number.
///
/// Accepts an optional `+91` or `0` prefix and ignores spaces and dashes;
/// the stored form is the bare ten digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPhone`] unless exactly ten digits remain
    /// after stripping separators and the country/trunk prefix.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let compact: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        let digits = compact
            .strip_prefix("+91")
            .or_else(|| (compact.len() == 11).then(|| compact.strip_prefix('0')).flatten())
            .unwrap_or(&compact);

        if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(digits.to_owned()))
        } else {
            Err(ContactError::InvalidPhone)
        }
    }

    /// Returns the ten digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A six digit Indian postal index number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Parse a pincode.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPincode`] unless the trimmed input is six
    /// ASCII digits not starting with `0`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        let valid = s.len() == 6 && s.chars().all(|c| c.is_ascii_digit()) && !s.starts_with('0');
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(ContactError::InvalidPincode)
        }
    }

    /// Returns the pincode digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user+tag@shop.co.in").is_ok());
        assert_eq!(Email::parse("  a@b.c ").unwrap().as_str(), "a@b.c");
    }

    #[test]
    fn test_email_invalid() {
        assert_eq!(Email::parse(""), Err(ContactError::EmptyEmail));
        assert_eq!(Email::parse("no-at"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("@domain.com"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("user@"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("a@b@c"), Err(ContactError::MalformedEmail));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(ContactError::EmailTooLong { .. })
        ));
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(Phone::parse("9876543210").unwrap().as_str(), "9876543210");
        assert_eq!(Phone::parse("+91 98765-43210").unwrap().as_str(), "9876543210");
        assert_eq!(Phone::parse("09876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_phone_invalid() {
        assert_eq!(Phone::parse("12345"), Err(ContactError::InvalidPhone));
        assert_eq!(Phone::parse("98765abcde"), Err(ContactError::InvalidPhone));
        assert_eq!(Phone::parse(""), Err(ContactError::InvalidPhone));
    }

    #[test]
    fn test_pincode() {
        assert_eq!(Pincode::parse(" 560001 ").unwrap().as_str(), "560001");
        assert_eq!(Pincode::parse("056001"), Err(ContactError::InvalidPincode));
        assert_eq!(Pincode::parse("56001"), Err(ContactError::InvalidPincode));
        assert_eq!(Pincode::parse("56000a"), Err(ContactError::InvalidPincode));
    }

    #[test]
    fn test_serde_transparent() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"user@example.com\"");
    }
}
