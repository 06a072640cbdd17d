//! Tone and content-type labels passed through to content generation.

use serde::{Deserialize, Serialize};

/// Tone label for generated content. Advisory only.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tone {
    /// Professional
    #[default]
    Professional,
    /// Engaging
    Engaging,
    /// Casual
    Casual,
    /// Humorous
    Humorous,
    /// Inspirational
    Inspirational,
    /// Educational
    Educational,
}

/// Shape of the content requested from the generator.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContentType {
    /// Plain post
    #[default]
    Post,
    /// Post built around an image
    ImagePost,
    /// Short story-format post
    Story,
}
