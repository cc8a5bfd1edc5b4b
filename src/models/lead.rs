use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// The platforms a prospect can be researched on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Website,
    Instagram,
    Twitter,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Linkedin,
        Platform::Website,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Youtube,
    ];

    /// Identifier used on the wire and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Website => "website",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Youtube => "youtube",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Website => "Website",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "X/Twitter",
            Platform::Youtube => "YouTube",
        }
    }

    /// Example URL shown in an empty input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Platform::Linkedin => "https://linkedin.com/in/prospect-name",
            Platform::Website => "https://company-website.com",
            Platform::Instagram => "https://instagram.com/username",
            Platform::Twitter => "https://x.com/username",
            Platform::Youtube => "https://youtube.com/@channel",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| format!("Unknown platform '{}'", s))
    }
}

/// One URL to research, tagged with its platform.
///
/// Serialized as a two-element array `["linkedin", "https://..."]`, which is
/// the shape the research webhook consumes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(into = "(Platform, String)", from = "(Platform, String)")]
pub struct PlatformLink {
    pub platform: Platform,
    pub url: String,
}

impl From<PlatformLink> for (Platform, String) {
    fn from(link: PlatformLink) -> Self {
        (link.platform, link.url)
    }
}

impl From<(Platform, String)> for PlatformLink {
    fn from((platform, url): (Platform, String)) -> Self {
        PlatformLink { platform, url }
    }
}

/// Body POSTed to the lead research webhook.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeadRequest {
    pub urls: Vec<PlatformLink>,
    pub email: String,
    pub name: String,
}

impl LeadRequest {
    pub fn new(identity: &Identity, urls: Vec<PlatformLink>) -> Self {
        LeadRequest {
            urls,
            email: identity.email().to_string(),
            name: identity.name().to_string(),
        }
    }
}
