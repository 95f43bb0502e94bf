//! Journal reference numbers.
//!
//! Format: `JRN-YYYYMMDD-XXXX`, where `XXXX` is four upper-case hex digits.
//! Uniqueness is ultimately guaranteed by the database constraint; the
//! random suffix only keeps collisions rare.

use chrono::NaiveDate;
use uuid::Uuid;

/// Prefix of every journal reference.
pub const REFERENCE_PREFIX: &str = "JRN";

/// Builds a reference for `date` using the first four hex digits of `entropy`.
fn generate_reference(date: NaiveDate, entropy: Uuid) -> String {
    let simple = entropy.simple().to_string();
    let suffix = simple.get(..4).unwrap_or("0000").to_ascii_uppercase();
    format!("{REFERENCE_PREFIX}-{}-{suffix}", date.format("%Y%m%d"))
}

/// Builds a reference for `date` with a fresh random suffix.
#[must_use]
pub fn new_reference(date: NaiveDate) -> String {
    generate_reference(date, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_format() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let entropy = Uuid::parse_str("abcd1234-0000-4000-8000-000000000000").unwrap();
        assert_eq!(generate_reference(date, entropy), "JRN-20260214-ABCD");
    }

    fn has_reference_shape(reference: &str, date: NaiveDate) -> bool {
        let expected_prefix = format!("JRN-{}-", date.format("%Y%m%d"));
        reference.strip_prefix(&expected_prefix).is_some_and(|suffix| {
            suffix.len() == 4
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        })
    }

    #[test]
    fn test_new_reference_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let reference = new_reference(date);
        assert!(has_reference_shape(&reference, date), "{reference}");
    }

    proptest! {
        #[test]
        fn prop_generated_references_have_shape(
            days in 0i64..36_500,
            bits in any::<u128>(),
        ) {
            let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Days::new(days.unsigned_abs());
            let reference = generate_reference(date, Uuid::from_u128(bits));
            prop_assert!(has_reference_shape(&reference, date), "{}", reference);
        }
    }
}
