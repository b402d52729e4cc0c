//! Structural validators for pattern candidates
//!
//! OCR confuses a handful of glyphs (`O`/`0`, `I`/`l`/`1`, `S`/`5`, ...).
//! Candidates are normalized before validation, but only in the direction
//! each position of the identifier's template expects: a letter slot maps
//! digit look-alikes to letters, a digit slot maps letter look-alikes to
//! digits. A failing candidate is dropped by the extractor without error.

use piiveil_domain::PiiType;

/// Character class of one template segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Letter,
    Digit,
}

/// A run of `min..=max` characters of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    class: CharClass,
    min: usize,
    max: usize,
}

impl Segment {
    pub const fn letters(min: usize, max: usize) -> Self {
        Self { class: CharClass::Letter, min, max }
    }

    pub const fn digits(min: usize, max: usize) -> Self {
        Self { class: CharClass::Digit, min, max }
    }

    fn accepts(&self, chars: &[char]) -> bool {
        match self.class {
            CharClass::Digit => chars.iter().all(|c| normalize_digit(*c).is_some()),
            // A letter run made only of digit look-alikes is a number, not an id.
            CharClass::Letter => {
                chars.iter().all(|c| normalize_letter(*c).is_some())
                    && chars.iter().any(char::is_ascii_alphabetic)
            }
        }
    }
}

/// 5 letters, 4 digits, 1 letter.
pub const PAN_TEMPLATE: [Segment; 3] =
    [Segment::letters(5, 5), Segment::digits(4, 4), Segment::letters(1, 1)];

/// 2 letters, 2 digits, 6-13 digits.
pub const DL_TEMPLATE: [Segment; 3] =
    [Segment::letters(2, 2), Segment::digits(2, 2), Segment::digits(6, 13)];

/// 3 letters, 6-8 digits.
pub const VOTER_ID_TEMPLATE: [Segment; 2] = [Segment::letters(3, 3), Segment::digits(6, 8)];

/// 1 letter, 6-8 digits.
pub const PASSPORT_TEMPLATE: [Segment; 2] = [Segment::letters(1, 1), Segment::digits(6, 8)];

/// Map a character to the digit it is read as, if any.
pub const fn normalize_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        'O' | 'o' => Some('0'),
        'I' | 'l' => Some('1'),
        _ => None,
    }
}

/// Map a character to the upper-case letter it is read as, if any.
pub const fn normalize_letter(c: char) -> Option<char> {
    match c {
        'A'..='Z' => Some(c),
        'a'..='z' => Some(c.to_ascii_uppercase()),
        '0' => Some('O'),
        '1' => Some('I'),
        '2' => Some('Z'),
        '5' => Some('S'),
        '8' => Some('B'),
        _ => None,
    }
}

/// Digits of `value` after digit normalization; everything else discarded.
pub fn normalized_digits(value: &str) -> String {
    value.chars().filter_map(normalize_digit).collect()
}

/// True when `value`, with whitespace and hyphens removed, fits `template`
/// under position-aware normalization.
pub fn matches_template(value: &str, template: &[Segment]) -> bool {
    let chars: Vec<char> = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    match_segments(&chars, template)
}

fn match_segments(chars: &[char], template: &[Segment]) -> bool {
    let Some((segment, rest)) = template.split_first() else {
        return chars.is_empty();
    };

    let longest = segment.max.min(chars.len());
    (segment.min..=longest).any(|len| {
        let (head, tail) = chars.split_at(len);
        segment.accepts(head) && match_segments(tail, rest)
    })
}

/// 12 digits, not starting with 0 or 1.
pub fn is_valid_aadhaar(value: &str) -> bool {
    let digits = normalized_digits(value);
    digits.len() == 12 && !digits.starts_with(&['0', '1'][..])
}

/// 10 digits, starting with 6, 7, 8 or 9.
pub fn is_valid_phone(value: &str) -> bool {
    let digits = normalized_digits(value);
    digits.len() == 10 && digits.starts_with(&['6', '7', '8', '9'][..])
}

pub fn is_valid_pan(value: &str) -> bool {
    matches_template(value, &PAN_TEMPLATE)
}

pub fn is_valid_driving_licence(value: &str) -> bool {
    matches_template(value, &DL_TEMPLATE)
}

pub fn is_valid_voter_id(value: &str) -> bool {
    matches_template(value, &VOTER_ID_TEMPLATE)
}

pub fn is_valid_passport(value: &str) -> bool {
    matches_template(value, &PASSPORT_TEMPLATE)
}

/// Validator for `pii_type`, or `None` when a pattern match is accepted as is.
pub fn validator_for(pii_type: PiiType) -> Option<fn(&str) -> bool> {
    match pii_type {
        PiiType::Aadhaar => Some(is_valid_aadhaar),
        PiiType::Pan => Some(is_valid_pan),
        PiiType::DrivingLicence => Some(is_valid_driving_licence),
        PiiType::VoterId => Some(is_valid_voter_id),
        PiiType::Passport => Some(is_valid_passport),
        PiiType::Phone => Some(is_valid_phone),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_requires_twelve_digits_and_valid_lead() {
        assert!(is_valid_aadhaar("2345 6789 0123"));
        assert!(is_valid_aadhaar("2345-6789-O123"));
        assert!(!is_valid_aadhaar("1234 5678 9012"));
        assert!(!is_valid_aadhaar("0234 5678 9012"));
        assert!(!is_valid_aadhaar("2345 6789 012"));
    }

    #[test]
    fn phone_requires_mobile_prefix() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("987 654 3210"));
        assert!(is_valid_phone("98765432lO"));
        assert!(!is_valid_phone("5876543210"));
        assert!(!is_valid_phone("987654321"));
    }

    #[test]
    fn pan_keeps_real_digits_in_digit_slots() {
        assert!(is_valid_pan("ABCDE1234F"));
        assert!(is_valid_pan("abcde1234f"));
        // OCR read the B as 8 and the 0 as O.
        assert!(is_valid_pan("A8CDE1O34F"));
        assert!(!is_valid_pan("ABCDE12345"));
        assert!(!is_valid_pan("ABCD1234F"));
    }

    #[test]
    fn driving_licence_accepts_separated_forms() {
        assert!(is_valid_driving_licence("TN01 20201234567"));
        assert!(is_valid_driving_licence("TN0120201234567"));
        assert!(is_valid_driving_licence("TN01-20201234567"));
        assert!(!is_valid_driving_licence("TN01 20201"));
    }

    #[test]
    fn all_digit_values_are_not_ids() {
        assert!(!is_valid_driving_licence("123456789012"));
        assert!(!is_valid_pan("1234512345"));
        assert!(!is_valid_passport("51234567"));
    }

    #[test]
    fn voter_and_passport_templates() {
        assert!(is_valid_voter_id("ABC1234567"));
        assert!(!is_valid_voter_id("ABC12345"));
        assert!(is_valid_passport("K1234567"));
        assert!(!is_valid_passport("K12345"));
    }

    #[test]
    fn unvalidated_types_have_no_validator() {
        assert!(validator_for(PiiType::Email).is_none());
        assert!(validator_for(PiiType::Account).is_none());
        assert!(validator_for(PiiType::Aadhaar).is_some());
    }
}
