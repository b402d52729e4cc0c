//! Type-aware masking of entity values
//!
//! Lengths count `char`s, so a masked value never splits a multi-byte
//! character.

use piiveil_domain::constants::{
    EMAIL_MASK_MIN_STARS, GENERIC_MASK_VISIBLE_TAIL, MASK_CHAR, PAN_MASK_PREFIX,
    PAN_MASK_VISIBLE_TAIL,
};
use piiveil_domain::PiiType;

fn stars(count: usize) -> String {
    std::iter::repeat(MASK_CHAR).take(count).collect()
}

/// Last `count` chars of `value`.
fn tail(value: &str, count: usize) -> &str {
    let skip = value.chars().count().saturating_sub(count);
    value.char_indices().nth(skip).map_or("", |(index, _)| &value[index..])
}

/// Mask `value` according to its category.
///
/// PAN keeps its last five characters behind a fixed prefix. Any
/// email-shaped value keeps its domain and the last character of the local
/// part. Everything else keeps its last four characters.
pub fn mask_value(value: &str, pii_type: PiiType) -> String {
    if pii_type == PiiType::Pan {
        return mask_pan(value);
    }
    if let Some((local, domain)) = value.split_once('@') {
        return mask_email(local, domain);
    }
    mask_generic(value)
}

fn mask_pan(value: &str) -> String {
    let len = value.chars().count();
    if len <= PAN_MASK_VISIBLE_TAIL {
        return stars(len);
    }
    format!("{PAN_MASK_PREFIX}{}", tail(value, PAN_MASK_VISIBLE_TAIL))
}

fn mask_email(local: &str, domain: &str) -> String {
    let local_len = local.chars().count();
    if local_len <= 1 {
        return format!("{MASK_CHAR}@{domain}");
    }
    let hidden = EMAIL_MASK_MIN_STARS.max(local_len - 1);
    format!("{}{}@{domain}", stars(hidden), tail(local, 1))
}

fn mask_generic(value: &str) -> String {
    let len = value.chars().count();
    if len <= GENERIC_MASK_VISIBLE_TAIL {
        return stars(len);
    }
    format!("{}{}", stars(len - GENERIC_MASK_VISIBLE_TAIL), tail(value, GENERIC_MASK_VISIBLE_TAIL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_keeps_last_five_behind_fixed_prefix() {
        assert_eq!(mask_value("ABCDE1234F", PiiType::Pan), "******1234F");
        assert_eq!(mask_value("AB12F", PiiType::Pan), "*****");
    }

    #[test]
    fn email_keeps_domain_and_last_local_char() {
        assert_eq!(mask_value("john@gmail.com", PiiType::Email), "*****n@gmail.com");
        assert_eq!(mask_value("alexandra@x.io", PiiType::Email), "********a@x.io");
        assert_eq!(mask_value("j@gmail.com", PiiType::Email), "*@gmail.com");
    }

    #[test]
    fn email_shape_applies_to_any_type() {
        assert_eq!(mask_value("ab@c.d", PiiType::Address), "*****b@c.d");
    }

    #[test]
    fn generic_keeps_last_four() {
        assert_eq!(mask_value("9876543210", PiiType::Phone), "******3210");
        assert_eq!(mask_value("1234", PiiType::Account), "****");
        assert_eq!(mask_value("", PiiType::Account), "");
    }

    #[test]
    fn lengths_count_chars_not_bytes() {
        assert_eq!(mask_value("çàfé12", PiiType::Dob), "**fé12");
        assert_eq!(mask_value("éé", PiiType::Dob), "**");
    }
}
