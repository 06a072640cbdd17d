//! Platform credential configuration.
//!
//! Every credential may be left out of the configuration file and supplied
//! through the environment instead (`FB_PAGE_ID`, `FB_ACCESS_TOKEN`,
//! `IG_ACCOUNT_ID`, `IG_ACCESS_TOKEN`, `TWITTER_API_KEY`, `TWITTER_API_SECRET`,
//! `TWITTER_ACCESS_TOKEN`, `TWITTER_ACCESS_TOKEN_SECRET`, `LINKEDIN_PERSON_ID`,
//! `LINKEDIN_ACCESS_TOKEN`).

use postmill_core::Platform;
use serde::{Deserialize, Serialize};

pub(crate) const GRAPH_API_BASE: &str = "https://graph.facebook.com/v23.0";
pub(crate) const LINKEDIN_API_BASE: &str = "https://api.linkedin.com";

fn default_graph_base() -> String {
    GRAPH_API_BASE.to_string()
}

fn default_linkedin_base() -> String {
    LINKEDIN_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn env_fallback(value: &mut Option<String>, var: &str) {
    let configured = value.as_deref().is_some_and(|v| !v.trim().is_empty());
    if !configured {
        *value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
    }
}

/// Non-blank credential value.
pub(crate) fn credential(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Facebook page credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookConfig {
    /// Page to publish to
    #[serde(default)]
    pub page_id: Option<String>,
    /// Page access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Graph API base URL
    #[serde(default = "default_graph_base")]
    pub base_url: String,
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            page_id: None,
            access_token: None,
            base_url: default_graph_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Instagram business account credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Business account id
    #[serde(default)]
    pub account_id: Option<String>,
    /// Access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Graph API base URL
    #[serde(default = "default_graph_base")]
    pub base_url: String,
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            access_token: None,
            base_url: default_graph_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Twitter application and user credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Consumer key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Consumer secret
    #[serde(default)]
    pub api_secret: Option<String>,
    /// User access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// User access token secret
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

/// LinkedIn member credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedinConfig {
    /// Person id used in the author URN
    #[serde(default)]
    pub person_id: Option<String>,
    /// OAuth access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// REST API base URL
    #[serde(default = "default_linkedin_base")]
    pub base_url: String,
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LinkedinConfig {
    fn default() -> Self {
        Self {
            person_id: None,
            access_token: None,
            base_url: default_linkedin_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Credentials for every supported platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformsConfig {
    /// Facebook settings
    #[serde(default)]
    pub facebook: FacebookConfig,
    /// Instagram settings
    #[serde(default)]
    pub instagram: InstagramConfig,
    /// Twitter settings
    #[serde(default)]
    pub twitter: TwitterConfig,
    /// LinkedIn settings
    #[serde(default)]
    pub linkedin: LinkedinConfig,
}

impl PlatformsConfig {
    /// Fill credentials missing from configuration with environment values.
    pub fn with_env_fallback(mut self) -> Self {
        env_fallback(&mut self.facebook.page_id, "FB_PAGE_ID");
        env_fallback(&mut self.facebook.access_token, "FB_ACCESS_TOKEN");
        env_fallback(&mut self.instagram.account_id, "IG_ACCOUNT_ID");
        env_fallback(&mut self.instagram.access_token, "IG_ACCESS_TOKEN");
        env_fallback(&mut self.twitter.api_key, "TWITTER_API_KEY");
        env_fallback(&mut self.twitter.api_secret, "TWITTER_API_SECRET");
        env_fallback(&mut self.twitter.access_token, "TWITTER_ACCESS_TOKEN");
        env_fallback(
            &mut self.twitter.access_token_secret,
            "TWITTER_ACCESS_TOKEN_SECRET",
        );
        env_fallback(&mut self.linkedin.person_id, "LINKEDIN_PERSON_ID");
        env_fallback(&mut self.linkedin.access_token, "LINKEDIN_ACCESS_TOKEN");
        self
    }

    /// Platforms whose credentials are incomplete.
    pub fn missing_credentials(&self) -> Vec<Platform> {
        let mut missing = Vec::new();
        if credential(&self.facebook.page_id).is_none()
            || credential(&self.facebook.access_token).is_none()
        {
            missing.push(Platform::Facebook);
        }
        if credential(&self.instagram.account_id).is_none()
            || credential(&self.instagram.access_token).is_none()
        {
            missing.push(Platform::Instagram);
        }
        let twitter = &self.twitter;
        if [
            &twitter.api_key,
            &twitter.api_secret,
            &twitter.access_token,
            &twitter.access_token_secret,
        ]
        .into_iter()
        .any(|v| credential(v).is_none())
        {
            missing.push(Platform::Twitter);
        }
        if credential(&self.linkedin.person_id).is_none()
            || credential(&self.linkedin.access_token).is_none()
        {
            missing.push(Platform::Linkedin);
        }
        missing
    }
}
