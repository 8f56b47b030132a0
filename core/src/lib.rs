//! Result algebra and combinator pipelines for Statecraft.
//!
//! Pure, synchronous transformations over immutable values:
//!
//! - [`outcome`]: constructors and predicates over `Result`.
//! - [`Pipeline`]: a fluent wrapper that short-circuits on the first error.
//! - [`ContextPipeline`]: the same rules, plus an append-only [`Context`]
//!   that later steps can read.

pub mod context;
mod context_pipeline;
pub mod outcome;
mod pipeline;

pub use context::{Context, ContextError, ContextKey};
pub use context_pipeline::{ContextPipeline, pipe_result_with_context, pipe_with_context};
pub use outcome::{error, is_error, is_ok, ok};
pub use pipeline::{Pipeline, pipe_error, pipe_ok, pipe_result};
