//! Platform publisher dispatch for Postmill.
//!
//! Routes a piece of content (and an optional image reference) to the
//! publisher registered for each target platform and normalizes every result
//! into a [`PlatformOutcome`]. Each platform is a [`Publisher`] strategy; the
//! engine only ever talks to [`PublisherDispatch`].
//!
//! # Platforms
//!
//! - [`FacebookPublisher`]: page feed or photo post, with a pre-flight token check
//! - [`InstagramPublisher`]: two-step media container publish, image required
//! - [`TwitterPublisher`]: credential validation only
//! - [`LinkedinPublisher`]: UGC post on behalf of a person URN

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dispatch;
mod graph;
mod platforms;
mod publisher;
mod token;

pub use config::{
    FacebookConfig, InstagramConfig, LinkedinConfig, PlatformsConfig, TwitterConfig,
};
pub use dispatch::{PlatformOutcome, PublisherDispatch};
pub use platforms::{FacebookPublisher, InstagramPublisher, LinkedinPublisher, TwitterPublisher};
pub use publisher::{PublishReceipt, PublishRequest, Publisher};
pub use token::{TokenValidation, validate_token};
