use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Closed set of PII categories the pipeline recognizes.
///
/// Every category except [`PiiType::Person`] is produced by the pattern
/// table; `Person` is the generic "name" category supplied by an external
/// NER capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    /// 12-digit national identity number.
    Aadhaar,
    /// Permanent account number (tax id).
    Pan,
    /// Driving licence number.
    #[serde(rename = "DL")]
    DrivingLicence,
    VoterId,
    Passport,
    Phone,
    Email,
    /// Bank branch code.
    Ifsc,
    /// Bank account number.
    Account,
    /// Date of birth, or any date-shaped value.
    Dob,
    IpAddress,
    /// Postal address captured after an `Address:` label.
    Address,
    /// Person name from the NER capability.
    Person,
}

impl_wire_name_conversions!(PiiType {
    Aadhaar => "AADHAAR",
    Pan => "PAN",
    DrivingLicence => "DL",
    VoterId => "VOTER_ID",
    Passport => "PASSPORT",
    Phone => "PHONE",
    Email => "EMAIL",
    Ifsc => "IFSC",
    Account => "ACCOUNT",
    Dob => "DOB",
    IpAddress => "IP_ADDRESS",
    Address => "ADDRESS",
    Person => "PERSON",
});

impl PiiType {
    /// Every category, in rule-table order followed by `Person`.
    pub const ALL: [Self; 13] = [
        Self::Aadhaar,
        Self::Pan,
        Self::DrivingLicence,
        Self::VoterId,
        Self::Passport,
        Self::Phone,
        Self::Email,
        Self::Ifsc,
        Self::Account,
        Self::Dob,
        Self::IpAddress,
        Self::Address,
        Self::Person,
    ];

    /// Categories covered by the pattern table.
    pub const PATTERN_TYPES: [Self; 12] = [
        Self::Aadhaar,
        Self::Pan,
        Self::DrivingLicence,
        Self::VoterId,
        Self::Passport,
        Self::Phone,
        Self::Email,
        Self::Ifsc,
        Self::Account,
        Self::Dob,
        Self::IpAddress,
        Self::Address,
    ];

    /// True for the name category that only the model produces.
    pub const fn is_model_only(self) -> bool {
        matches!(self, Self::Person)
    }
}
