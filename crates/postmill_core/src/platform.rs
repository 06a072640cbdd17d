//! Supported publishing platforms.

use serde::{Deserialize, Serialize};

/// Social platform a post can be published to.
///
/// The set is fixed: a feed/photo service, an image-first service, a
/// short-text service and a professional-network service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    /// Feed/photo service (page feed or photo post)
    Facebook,
    /// Image-first service; every post needs an image
    Instagram,
    /// Short-text service
    Twitter,
    /// Professional-network service
    Linkedin,
}

impl Platform {
    /// Whether the platform refuses text-only posts.
    pub fn requires_image(self) -> bool {
        matches!(self, Self::Instagram)
    }

    /// Maximum post length in characters accepted by the platform.
    pub fn max_text_length(self) -> usize {
        match self {
            Self::Facebook => 63_206,
            Self::Instagram => 2_200,
            Self::Twitter => 280,
            Self::Linkedin => 3_000,
        }
    }
}
