use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

macro_rules! ledger_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a ledger-assigned value.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

ledger_id!(
    EventId,
    "Ledger-assigned sequential event identifier (first event is 0)."
);
ledger_id!(
    TicketId,
    "Ledger-assigned sequential ticket identifier (first ticket is 0)."
);

macro_rules! opaque_token {
    ($name:ident, $doc:expr, $field:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: $field,
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

opaque_token!(
    Phone,
    "Holder phone number: exactly ten decimal digits.",
    "phone",
    r"^\d{10}$"
);
opaque_token!(
    IdentityToken,
    "One-way binding of (phone, event): base64url SHA-256, no padding.",
    "identity_token",
    r"^[A-Za-z0-9_-]{43}$"
);
opaque_token!(
    PaymentId,
    "One-way hash of a payment reference: base64url SHA-256, no padding.",
    "payment_id",
    r"^[A-Za-z0-9_-]{43}$"
);

/// Opaque reference to a finalized ledger write.
///
/// Returned by every state-changing ledger operation and surfaced to
/// callers as `transactionRef`; carries no structure the core relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxRef(String);

impl TxRef {
    /// Wraps a ledger-produced reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TxRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_ten_digits() {
        assert!(Phone::parse("9876543210").is_ok());
    }

    #[test]
    fn phone_rejects_bad_shapes() {
        assert!(Phone::parse("123456789").is_err());
        assert!(Phone::parse("12345678901").is_err());
        assert!(Phone::parse("987654321x").is_err());
        assert!(Phone::parse("+919876543210").is_err());
        assert!(Phone::parse("").is_err());
    }

    #[test]
    fn identity_token_rejects_padding_and_length() {
        assert!(IdentityToken::parse("A".repeat(43)).is_ok());
        assert!(IdentityToken::parse("A".repeat(42)).is_err());
        assert!(IdentityToken::parse(format!("{}=", "A".repeat(42))).is_err());
    }

    #[test]
    fn ledger_ids_round_trip_serde() {
        let id = EventId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
