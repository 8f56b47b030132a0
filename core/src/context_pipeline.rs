use std::convert::Infallible;
use std::fmt;

use crate::context::Context;
use crate::pipeline::{Pipeline, pipe_result};

/// A [`Pipeline`] that also threads a context through the chain.
///
/// The short-circuit rule is the same: after the first error no success-path
/// closure runs, including [`set_context`](Self::set_context). Steps receive
/// the context as of their own link, so a value stored early is readable by
/// every later step.
///
/// `C` is the context shape. It defaults to the dynamic [`Context`], but any
/// type works; `set_context` returns a fresh `C` rather than mutating one.
#[derive(Debug, Clone)]
#[must_use = "a pipeline does nothing until it is turned back into a value"]
pub struct ContextPipeline<T, E, C = Context> {
    result: Result<T, E>,
    context: C,
}

/// Wrap `result` with an empty [`Context`].
pub fn pipe_result_with_context<T, E>(result: Result<T, E>) -> ContextPipeline<T, E> {
    pipe_with_context(result, Context::new())
}

/// Wrap `result` with a caller-defined context shape.
pub fn pipe_with_context<T, E, C>(result: Result<T, E>, context: C) -> ContextPipeline<T, E, C> {
    ContextPipeline { result, context }
}

impl<T, E, C> ContextPipeline<T, E, C> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    /// The context as of this link.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Compute the next context from the current data. Runs on `Ok` only and
    /// leaves the result untouched.
    pub fn set_context(self, f: impl FnOnce(&T, &C) -> C) -> Self {
        let context = match &self.result {
            Ok(data) => f(data, &self.context),
            Err(_) => self.context,
        };
        Self {
            result: self.result,
            context,
        }
    }

    pub fn map<R>(self, f: impl FnOnce(T, &C) -> R) -> ContextPipeline<R, E, C> {
        let Self { result, context } = self;
        let result = result.map(|data| f(data, &context));
        ContextPipeline { result, context }
    }

    pub fn flat_map<R, F>(self, f: impl FnOnce(T, &C) -> Result<R, F>) -> ContextPipeline<R, E, C>
    where
        F: Into<E>,
    {
        let Self { result, context } = self;
        let result = result.and_then(|data| f(data, &context).map_err(Into::into));
        ContextPipeline { result, context }
    }

    pub fn map_error<F>(self, f: impl FnOnce(E) -> F) -> ContextPipeline<T, F, C> {
        ContextPipeline {
            result: self.result.map_err(f),
            context: self.context,
        }
    }

    pub fn widen_error<U>(self) -> ContextPipeline<T, U, C>
    where
        E: Into<U>,
    {
        self.map_error(Into::into)
    }

    pub fn tap(self, f: impl FnOnce(&T, &C)) -> Self {
        if let Ok(data) = &self.result {
            f(data, &self.context);
        }
        self
    }

    pub fn tap_error(self, f: impl FnOnce(&E, &C)) -> Self {
        if let Err(err) = &self.result {
            f(err, &self.context);
        }
        self
    }

    pub fn filter(self, predicate: impl FnOnce(&T, &C) -> bool, rejection: impl Into<E>) -> Self {
        let Self { result, context } = self;
        let result = result.and_then(|data| {
            if predicate(&data, &context) {
                Ok(data)
            } else {
                Err(rejection.into())
            }
        });
        Self { result, context }
    }

    pub fn recover(self, f: impl FnOnce(E, &C) -> T) -> ContextPipeline<T, Infallible, C> {
        let Self { result, context } = self;
        let data = result.unwrap_or_else(|err| f(err, &context));
        ContextPipeline {
            result: Ok(data),
            context,
        }
    }

    /// Drop the context and continue as a plain [`Pipeline`].
    pub fn into_pipeline(self) -> Pipeline<T, E> {
        pipe_result(self.result)
    }

    #[must_use]
    pub fn into_parts(self) -> (Result<T, E>, C) {
        (self.result, self.context)
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

    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: fmt::Debug,
    {
        self.into_pipeline().unwrap()
    }
}

impl<T, C> ContextPipeline<T, Infallible, C> {
    pub fn into_ok(self) -> T {
        self.into_pipeline().into_ok()
    }
}
