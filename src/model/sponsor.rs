//! Sponsor recognition domain models.

use serde::{Deserialize, Serialize};

/// Sponsor roles configured for a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorRoles {
    pub monthly_role_id: Option<u64>,
    pub one_time_role_id: Option<u64>,
}

/// A platform sponsors can donate through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorPlatform {
    pub name: String,
    pub emoji: String,
    pub url: Option<String>,
}

/// Role granted to sponsors donating through a given platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorPlatformRole {
    pub role_id: u64,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SponsorKind {
    Subscription,
    OneTime,
}

impl SponsorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::OneTime => "one-time",
        }
    }
}

/// Sponsor standing of a single member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorStatus {
    pub kind: SponsorKind,
    /// Platforms whose role the member holds.
    pub platforms: Vec<SponsorPlatform>,
}
