//! Unwrap helpers with good error messages.
//!
//! Test code never calls `unwrap()` or `expect()` directly; these helpers
//! carry `#[track_caller]` so a failure points at the test line.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error value on `Err`.
///
/// ```rust
/// use modsig_test_helpers::must;
///
/// let bytes: Result<Vec<u8>, std::io::Error> = Ok(vec![1, 2]);
/// assert_eq!(must(bytes).len(), 2);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap a `Result`, prefixing the panic message with `context`.
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{context}: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// ```rust
/// use modsig_test_helpers::must_some;
///
/// let first = must_some([7u8, 8].first().copied(), "non-empty");
/// assert_eq!(first, 7);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Expect an `Err`, returning the error value.
///
/// # Panics
///
/// Panics if the result is `Ok`.
#[track_caller]
pub fn must_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(v) => panic!("must_err: unexpected Ok: {v:?}"),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_ok() {
        let r: Result<u8, &str> = Ok(3);
        assert_eq!(must(r), 3);
    }

    #[test]
    #[should_panic(expected = "must: unexpected Err")]
    fn test_must_err_panics() {
        let r: Result<u8, &str> = Err("boom");
        must(r);
    }

    #[test]
    #[should_panic(expected = "loading: ")]
    fn test_must_with_context() {
        let r: Result<u8, &str> = Err("boom");
        must_with(r, "loading");
    }

    #[test]
    fn test_must_err_returns_error() {
        let r: Result<u8, &str> = Err("boom");
        assert_eq!(must_err(r), "boom");
    }

    #[test]
    #[should_panic(expected = "must_some: nothing")]
    fn test_must_some_none() {
        let o: Option<u8> = None;
        must_some(o, "nothing");
    }
}
