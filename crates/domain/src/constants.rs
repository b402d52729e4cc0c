//! Pipeline constants
//!
//! Centralized location for domain-level constants used throughout the
//! workspace.

// Text redaction
pub const REDACTION_BLOCK: &str = "████████";
pub const MASK_CHAR: char = '*';
pub const GENERIC_MASK_VISIBLE_TAIL: usize = 4;
pub const PAN_MASK_PREFIX: &str = "******";
pub const PAN_MASK_VISIBLE_TAIL: usize = 5;
pub const EMAIL_MASK_MIN_STARS: usize = 5;

// OCR layout reconstruction
pub const WORD_SEPARATOR: &str = " ";
pub const PAGE_SEPARATOR: &str = "\n\n";

// Input limits
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

// External capabilities
pub const DEFAULT_NER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_ADVISORY_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_ADVISORY_TOP_K: usize = 3;
pub const DEFAULT_ADVISORY_CONCURRENCY: usize = 8;
pub const DEFAULT_CAPABILITY_ATTEMPTS: usize = 2;
pub const ADVISORY_INSTRUCTION: &str = "Return JSON with action in {REDACT, MASK, KEEP}.";

// Visual redaction
pub const DEFAULT_FILL_RGB: [u8; 3] = [0, 0, 0];
