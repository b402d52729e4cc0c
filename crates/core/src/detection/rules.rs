//! The static, ordered pattern rule table
//!
//! Order is load-bearing: the merger breaks ties between equal spans by
//! extraction order, and extraction walks this table top to bottom.

use once_cell::sync::Lazy;
use piiveil_domain::PiiType;
use regex::Regex;

use super::validators::validator_for;

// Digit slots accept the O/I/l look-alikes OCR produces; letter slots
// accept digits. The validators decide which reading is real.
static AADHAAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9OIl]{4}[\s\-]?[0-9OIl]{4}[\s\-]?[0-9OIl]{3,4}\b")
        .expect("AADHAAR_REGEX should compile - this is a bug")
});

static PAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z0-9]{4,6}[0-9OIl]{3,5}[A-Z0-9]\b")
        .expect("PAN_REGEX should compile - this is a bug")
});

static DL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z0-9]{2}[0-9OIl]{2}[\s\-]?[0-9OIl]{6,13}\b")
        .expect("DL_REGEX should compile - this is a bug")
});

static VOTER_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z0-9]{3}[0-9OIl]{6,8}\b")
        .expect("VOTER_ID_REGEX should compile - this is a bug")
});

static PASSPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z0-9][0-9OIl]{6,8}\b")
        .expect("PASSPORT_REGEX should compile - this is a bug")
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[6-9OIl][0-9OIl]{2}[\s\-]?[0-9OIl]{3}[\s\-]?[0-9OIl]{4}\b")
        .expect("PHONE_REGEX should compile - this is a bug")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[\w.\-]+@[\w.\-]+\.\w+\b").expect("EMAIL_REGEX should compile - this is a bug")
});

static IFSC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z0-9]{4}[0O][A-Z0-9]{6}\b").expect("IFSC_REGEX should compile - this is a bug")
});

static ACCOUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9OIl]{9,18}\b").expect("ACCOUNT_REGEX should compile - this is a bug")
});

static DOB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b")
        .expect("DOB_REGEX should compile - this is a bug")
});

static IP_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("IP_ADDRESS_REGEX should compile - this is a bug")
});

static ADDRESS_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Address|Addr)[:\-]").expect("ADDRESS_LABEL_REGEX should compile - this is a bug")
});

/// A following line that looks like another `Label:` marker ends an address.
static NEXT_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\n\s*[A-Za-z ]{2,20}[:\-]").expect("NEXT_LABEL_REGEX should compile - this is a bug")
});

const ADDRESS_MIN_CHARS: usize = 10;
const ADDRESS_MAX_CHARS: usize = 200;

/// How a rule turns regex hits into spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// The whole match is the span.
    Whole,
    /// The regex finds a label; the span is the text that follows it.
    LabeledAddress,
}

/// A span located by a rule, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    /// Normalized value for labeled captures, `None` for whole matches.
    pub normalized: Option<String>,
}

/// One `(type, pattern, validator?)` entry of the rule table.
pub struct PatternRule {
    pub pii_type: PiiType,
    regex: &'static Lazy<Regex>,
    capture: Capture,
    validator: Option<fn(&str) -> bool>,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("pii_type", &self.pii_type)
            .field("pattern", &self.regex.as_str())
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl PatternRule {
    fn new(pii_type: PiiType, regex: &'static Lazy<Regex>) -> Self {
        Self { pii_type, regex, capture: Capture::Whole, validator: validator_for(pii_type) }
    }

    fn labeled(pii_type: PiiType, regex: &'static Lazy<Regex>) -> Self {
        Self { capture: Capture::LabeledAddress, ..Self::new(pii_type, regex) }
    }

    /// Regex source, for diagnostics.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// All spans this rule locates in `text`, in text order, unvalidated.
    pub fn find(&self, text: &str) -> Vec<RawMatch> {
        match self.capture {
            Capture::Whole => self
                .regex
                .find_iter(text)
                .map(|m| RawMatch { start: m.start(), end: m.end(), normalized: None })
                .collect(),
            Capture::LabeledAddress => find_labeled_addresses(text, self.regex),
        }
    }

    /// Validate the raw text of a candidate. Rules without a validator accept
    /// every match.
    pub fn accepts(&self, candidate: &str) -> bool {
        self.validator.map_or(true, |validate| validate(candidate))
    }
}

/// The rule table, in extraction order.
pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(PiiType::Aadhaar, &AADHAAR_REGEX),
        PatternRule::new(PiiType::Pan, &PAN_REGEX),
        PatternRule::new(PiiType::DrivingLicence, &DL_REGEX),
        PatternRule::new(PiiType::VoterId, &VOTER_ID_REGEX),
        PatternRule::new(PiiType::Passport, &PASSPORT_REGEX),
        PatternRule::new(PiiType::Phone, &PHONE_REGEX),
        PatternRule::new(PiiType::Email, &EMAIL_REGEX),
        PatternRule::new(PiiType::Ifsc, &IFSC_REGEX),
        PatternRule::new(PiiType::Account, &ACCOUNT_REGEX),
        PatternRule::new(PiiType::Dob, &DOB_REGEX),
        PatternRule::new(PiiType::IpAddress, &IP_ADDRESS_REGEX),
        PatternRule::labeled(PiiType::Address, &ADDRESS_LABEL_REGEX),
    ]
});

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '#' | '.' | ',' | '-' | '/')
}

/// True where an address capture may stop: end of text, just before a final
/// newline, or before a line that opens with another label.
fn address_ends_at(text: &str, pos: usize) -> bool {
    let rest = &text[pos..];
    rest.is_empty() || rest == "\n" || NEXT_LABEL_REGEX.is_match(rest)
}

/// Shortest capture of 10-200 address characters starting at `from` that
/// ends where [`address_ends_at`] holds.
fn capture_address(text: &str, from: usize) -> Option<usize> {
    let mut taken = 0;
    for (offset, c) in text[from..].char_indices() {
        if taken >= ADDRESS_MIN_CHARS && address_ends_at(text, from + offset) {
            return Some(from + offset);
        }
        if taken == ADDRESS_MAX_CHARS || !(is_address_char(c) || c.is_whitespace()) {
            return None;
        }
        taken += 1;
    }
    (taken >= ADDRESS_MIN_CHARS).then_some(text.len())
}

/// Locate `Address:`-style captures.
///
/// After the label, leading whitespace is skipped greedily; if no capture
/// fits, whitespace is handed back one character at a time and folded into
/// the capture instead.
fn find_labeled_addresses(text: &str, label: &Regex) -> Vec<RawMatch> {
    let mut found = Vec::new();
    let mut search_from = 0;

    while let Some(label_match) = label.find_at(text, search_from) {
        let label_end = label_match.end();
        let mut starts: Vec<usize> = text[label_end..]
            .char_indices()
            .take_while(|(_, c)| c.is_whitespace())
            .map(|(offset, c)| label_end + offset + c.len_utf8())
            .collect();
        starts.reverse();
        starts.push(label_end);

        let capture = starts
            .into_iter()
            .find_map(|start| capture_address(text, start).map(|end| (start, end)));

        match capture {
            Some((start, end)) => {
                let normalized = normalize_whitespace(&text[start..end]);
                if !normalized.is_empty() {
                    found.push(RawMatch { start, end, normalized: Some(normalized) });
                }
                search_from = end.max(label_end);
            }
            None => search_from = label_end,
        }

        if search_from >= text.len() {
            break;
        }
    }

    found
}
