//! Static support content: log file locations and help topics.

/// Desktop platform the companion application runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];

    pub fn name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Mac => "Mac",
            Self::Linux => "Linux",
        }
    }

    pub fn log_files_path(self) -> &'static str {
        match self {
            Self::Windows => "%APPDATA%\\Music Presence\\presence.log",
            Self::Mac => "~/Library/Application Support/Music Presence/presence.log",
            Self::Linux => "~/.local/share/Music Presence/presence.log",
        }
    }

    /// Parses a platform from its display name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Install,
    PlayerDetection,
    AppLogs,
}

impl HelpTopic {
    pub const ALL: [HelpTopic; 3] = [
        HelpTopic::Install,
        HelpTopic::PlayerDetection,
        HelpTopic::AppLogs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Install => "Installation",
            Self::PlayerDetection => "Player detection",
            Self::AppLogs => "Application logs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.name().eq_ignore_ascii_case(name))
    }
}
