//! Macro for implementing Display and FromStr for wire-named enums
//!
//! PII categories and actions travel as upper-case names (`"AADHAAR"`,
//! `"REDACT"`) in policy files, advisory payloads and JSON reports. This
//! macro keeps the string form in one place.
//!
//! # Example
//!
//! ```rust
//! use piiveil_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Text,
//!     Visual,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Text => "TEXT",
//!     Visual => "VISUAL",
//! });
//!
//! assert_eq!(Channel::Text.as_str(), "TEXT");
//! assert_eq!("visual".parse::<Channel>(), Ok(Channel::Visual));
//! ```

/// Implements `as_str`, Display and FromStr for wire-named enums
///
/// This macro generates:
/// - `as_str()`: the canonical wire name
/// - Display trait: writes the canonical wire name
/// - FromStr trait: parses case-insensitively, ignoring surrounding whitespace
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire name.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let candidate = s.trim();
                $(
                    if candidate.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKind {
        VoterId,
        Email,
    }

    impl_wire_name_conversions!(TestKind {
        VoterId => "VOTER_ID",
        Email => "EMAIL",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestKind::VoterId.to_string(), "VOTER_ID");
        assert_eq!(TestKind::Email.as_str(), "EMAIL");
    }

    #[test]
    fn test_fromstr_mixed_case_and_whitespace() {
        assert_eq!(TestKind::from_str("voter_id").unwrap(), TestKind::VoterId);
        assert_eq!(TestKind::from_str(" Email ").unwrap(), TestKind::Email);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestKind::from_str("passport");
        assert!(result.unwrap_err().contains("Invalid TestKind: passport"));
        assert!(TestKind::from_str("").is_err());
    }
}
