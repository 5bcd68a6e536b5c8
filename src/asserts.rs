//! Assertion helpers for entry bodies.
//!
//! Each helper returns the harness's structured assertion failure, so entry
//! bodies can bail with `?` and keep the mismatch detail in the record.

use std::fmt::Debug;

use crate::suite::entry::EntryError;

/// Assert two values are equal.
///
/// # Errors
///
/// Returns an assertion failure carrying both values when they differ.
pub fn equal<T: PartialEq + Debug>(actual: &T, expected: &T) -> Result<(), EntryError> {
    if actual == expected {
        Ok(())
    } else {
        Err(EntryError::assertion("values are not equal")
            .with_detail(format!("actual: {actual:?}\nexpected: {expected:?}")))
    }
}

/// Assert two values differ.
///
/// # Errors
///
/// Returns an assertion failure when the values are equal.
pub fn not_equal<T: PartialEq + Debug>(actual: &T, other: &T) -> Result<(), EntryError> {
    if actual == other {
        Err(EntryError::assertion("values are equal").with_detail(format!("both: {actual:?}")))
    } else {
        Ok(())
    }
}

/// Assert a condition holds.
///
/// # Errors
///
/// Returns an assertion failure naming the condition when it is false.
pub fn is_true(condition: bool, what: &str) -> Result<(), EntryError> {
    if condition {
        Ok(())
    } else {
        Err(EntryError::assertion(format!("expected {what} to hold")))
    }
}

/// Assert a condition does not hold.
///
/// # Errors
///
/// Returns an assertion failure naming the condition when it is true.
pub fn is_false(condition: bool, what: &str) -> Result<(), EntryError> {
    if condition {
        Err(EntryError::assertion(format!("expected {what} not to hold")))
    } else {
        Ok(())
    }
}

/// Assert a string contains a substring.
///
/// # Errors
///
/// Returns an assertion failure carrying both strings when it does not.
pub fn contains(haystack: &str, needle: &str) -> Result<(), EntryError> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(EntryError::assertion("substring not found")
            .with_detail(format!("haystack: {haystack:?}\nneedle: {needle:?}")))
    }
}

/// Assert two floats are within `delta` of each other.
///
/// # Errors
///
/// Returns an assertion failure carrying both values and the delta.
pub fn in_delta(actual: f64, expected: f64, delta: f64) -> Result<(), EntryError> {
    if (actual - expected).abs() <= delta {
        Ok(())
    } else {
        Err(EntryError::assertion("values differ by more than delta")
            .with_detail(format!("actual: {actual}\nexpected: {expected}\ndelta: {delta}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::entry::EntryErrorKind;

    #[test]
    fn equal_passes_and_fails() {
        assert!(equal(&1, &1).is_ok());
        let err = equal(&1, &2).unwrap_err();
        assert_eq!(err.kind, EntryErrorKind::AssertionFailed);
        assert_eq!(err.detail.as_deref(), Some("actual: 1\nexpected: 2"));
    }

    #[test]
    fn not_equal_passes_and_fails() {
        assert!(not_equal(&"a", &"b").is_ok());
        assert!(not_equal(&"a", &"a").is_err());
    }

    #[test]
    fn is_true_names_the_condition() {
        assert!(is_true(true, "session is active").is_ok());
        let err = is_true(false, "session is active").unwrap_err();
        assert_eq!(err.message, "expected session is active to hold");
    }

    #[test]
    fn is_false_names_the_condition() {
        assert!(is_false(false, "lock is held").is_ok());
        let err = is_false(true, "lock is held").unwrap_err();
        assert_eq!(err.message, "expected lock is held not to hold");
    }

    #[test]
    fn contains_passes_and_fails() {
        assert!(contains("hello world", "world").is_ok());
        let err = contains("hello world", "moon").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("moon"));
    }

    #[test]
    fn in_delta_bounds() {
        assert!(in_delta(1.0, 1.05, 0.1).is_ok());
        assert!(in_delta(1.0, 1.2, 0.1).is_err());
    }
}
