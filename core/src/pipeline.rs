//! Fluent combinators over a `Result`.
//!
//! Every step consumes the pipeline and returns a new one. Once the wrapped
//! result is an error, `map`, `flat_map`, `filter` and `tap` no longer call
//! their closures and the error value is moved through untouched. Only
//! `tap_error`, `map_error` and `recover` see the error.

use std::convert::Infallible;
use std::fmt;

use crate::context::Context;
use crate::context_pipeline::{ContextPipeline, pipe_with_context};

/// A chainable wrapper around `Result<T, E>`.
///
/// The error type of a chain is its full taxonomy: steps may fail with a
/// narrower error as long as it converts `Into<E>`, and
/// [`widen_error`](Self::widen_error) moves the whole channel to a wider
/// type. It never narrows except through [`map_error`](Self::map_error) or
/// [`recover`](Self::recover).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pipeline does nothing until it is turned back into a value"]
pub struct Pipeline<T, E> {
    result: Result<T, E>,
}

pub fn pipe_result<T, E>(result: Result<T, E>) -> Pipeline<T, E> {
    Pipeline { result }
}

pub fn pipe_ok<T, E>(data: T) -> Pipeline<T, E> {
    pipe_result(Ok(data))
}

pub fn pipe_error<T, E>(err: E) -> Pipeline<T, E> {
    pipe_result(Err(err))
}

impl<T, E> Pipeline<T, E> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Pipeline<R, E> {
        pipe_result(self.result.map(f))
    }

    /// Replace the result with whatever `f` decides. The step's own error
    /// type must convert into the chain's.
    pub fn flat_map<R, F>(self, f: impl FnOnce(T) -> Result<R, F>) -> Pipeline<R, E>
    where
        F: Into<E>,
    {
        pipe_result(self.result.and_then(|data| f(data).map_err(Into::into)))
    }

    pub fn map_error<F>(self, f: impl FnOnce(E) -> F) -> Pipeline<T, F> {
        pipe_result(self.result.map_err(f))
    }

    pub fn widen_error<U>(self) -> Pipeline<T, U>
    where
        E: Into<U>,
    {
        self.map_error(Into::into)
    }

    pub fn tap(self, f: impl FnOnce(&T)) -> Self {
        if let Ok(data) = &self.result {
            f(data);
        }
        self
    }

    pub fn tap_error(self, f: impl FnOnce(&E)) -> Self {
        if let Err(err) = &self.result {
            f(err);
        }
        self
    }

    /// Keep the data only if `predicate` holds, otherwise fail with `rejection`.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool, rejection: impl Into<E>) -> Self {
        match self.result {
            Ok(data) => {
                if predicate(&data) {
                    pipe_ok(data)
                } else {
                    pipe_error(rejection.into())
                }
            }
            Err(err) => pipe_error(err),
        }
    }

    /// Turn an error into data. The recovered pipeline cannot fail.
    pub fn recover(self, f: impl FnOnce(E) -> T) -> Pipeline<T, Infallible> {
        pipe_ok(self.result.unwrap_or_else(f))
    }

    /// Start carrying `context` alongside the result.
    pub fn with_context<C>(self, context: C) -> ContextPipeline<T, E, C> {
        pipe_with_context(self.result, context)
    }

    /// Start carrying an empty [`Context`].
    pub fn with_empty_context(self) -> ContextPipeline<T, E, Context> {
        self.with_context(Context::new())
    }

    #[must_use]
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        self.result.unwrap_or(default)
    }

    pub fn unwrap_or_else(self, f: impl FnOnce(E) -> T) -> T {
        self.result.unwrap_or_else(f)
    }

    /// Extract the data, panicking with the formatted error otherwise.
    ///
    /// This is the only place a pipeline's error escapes as a fault. Use
    /// [`into_result`](Self::into_result) or [`unwrap_or`](Self::unwrap_or)
    /// to handle it.
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: fmt::Debug,
    {
        self.expect("pipeline unwrapped in error state")
    }

    #[track_caller]
    pub fn expect(self, msg: &str) -> T
    where
        E: fmt::Debug,
    {
        match self.result {
            Ok(data) => data,
            Err(err) => {
                tracing::error!(error = ?err, "{msg}");
                panic!("{msg}: {err:?}");
            }
        }
    }
}

impl<T> Pipeline<T, Infallible> {
    /// Extract the data of a pipeline that cannot fail.
    pub fn into_ok(self) -> T {
        match self.result {
            Ok(data) => data,
            Err(never) => match never {},
        }
    }
}

impl<T, E> From<Result<T, E>> for Pipeline<T, E> {
    fn from(result: Result<T, E>) -> Self {
        pipe_result(result)
    }
}

impl<T, E> From<Pipeline<T, E>> for Result<T, E> {
    fn from(pipeline: Pipeline<T, E>) -> Self {
        pipeline.result
    }
}
