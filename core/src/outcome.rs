//! Constructors and predicates over `Result`.
//!
//! `Result` already is the two-variant outcome type. These free functions
//! exist so that pipelines can be started without spelling out both type
//! parameters, e.g. `ok::<_, CartError>(cart)`.

pub fn ok<T, E>(data: T) -> Result<T, E> {
    Ok(data)
}

pub fn error<T, E>(err: E) -> Result<T, E> {
    Err(err)
}

#[must_use]
pub fn is_ok<T, E>(result: &Result<T, E>) -> bool {
    result.is_ok()
}

#[must_use]
pub fn is_error<T, E>(result: &Result<T, E>) -> bool {
    result.is_err()
}
