//! Error types for the Postmill content automation engine.
//!
//! Every failure is a small struct carrying the caller's `line`/`file`
//! (captured with `#[track_caller]`), optionally discriminated by a `*Kind`
//! enum. [`PostmillError`] boxes whichever one occurred so `?` works across
//! crate boundaries.
//!
//! | Type | Raised when |
//! |------|-------------|
//! | [`GenerationError`] | every model in the fallback chain failed, or a single model call failed |
//! | [`PublishError`] | a platform rejected a post; the kind carries the outcome category |
//! | [`NotFoundError`] | a schedule or queued post id is unknown |
//! | [`InvalidRequestError`] | an action, body or schedule is malformed |
//! | [`ConfigError`] | configuration cannot be loaded or used |
//! | [`HttpError`] | the listener or token validation hits a transport failure |
//!
//! # Examples
//!
//! ```
//! use postmill_error::{NotFoundError, PostmillResult};
//!
//! fn find_schedule(id: &str) -> PostmillResult<()> {
//!     Err(NotFoundError::new("schedule", id))?
//! }
//!
//! assert!(find_schedule("missing").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod http;
mod invalid_request;
mod not_found;
mod publish;

pub use config::ConfigError;
pub use error::{PostmillError, PostmillErrorKind, PostmillResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult};
pub use http::HttpError;
pub use invalid_request::InvalidRequestError;
pub use not_found::NotFoundError;
pub use publish::{PublishError, PublishErrorKind, PublishResult};
