//! Support texts: log file locations, help topics and download links.

use crate::model::support::{HelpTopic, Platform};

pub const HELP_URL_INSTALL: &str = "https://github.com/ungive/discord-music-presence/blob/master/documentation/installation-instructions.md";
pub const HELP_URL_TROUBLESHOOTING: &str = "https://github.com/ungive/discord-music-presence/blob/master/documentation/troubleshooting.md";

const RELEASES_BASE_URL: &str = "https://github.com/ungive/discord-music-presence/releases";

/// Answer to a log file request, for one platform or all of them.
pub fn logs_response(platform: Option<Platform>) -> String {
    match platform {
        Some(platform) => format!(
            "You can find the log file for Music Presence on {} here:\n`{}`",
            platform.name(),
            platform.log_files_path()
        ),
        None => {
            let mut lines = vec!["You can find the log file for Music Presence here:".to_string()];
            lines.extend(
                Platform::ALL
                    .iter()
                    .map(|p| format!("- {}: `{}`", p.name(), p.log_files_path())),
            );
            lines.join("\n")
        }
    }
}

/// Help text for a topic, or the topic chooser when no topic is given.
pub fn help_message(topic: Option<HelpTopic>) -> String {
    let lines: Vec<String> = match topic {
        None => vec![
            "Choose the topic you need help with:".to_string(),
            format!(
                "- **{}**: For detailed installation instructions read the steps outlined [**here**](<{}>). \
                 If you can't find the download links for Music Presence, use the `/help topic:{}` command",
                HelpTopic::Install.name(),
                HELP_URL_INSTALL,
                HelpTopic::Install.name()
            ),
            format!(
                "- **{}**: For troubleshooting undetected media players find help [**here**](<{}>)",
                HelpTopic::PlayerDetection.name(),
                HELP_URL_TROUBLESHOOTING
            ),
            format!(
                "- **{}**: For paths to log files use the `/logs` command",
                HelpTopic::AppLogs.name()
            ),
        ],
        Some(HelpTopic::Install) => vec![
            "- To download the app, use any of the links below".to_string(),
            format!(
                "- Read the installation instructions [**here**](<{}>) \
                 if you need help with installing Music Presence",
                HELP_URL_INSTALL
            ),
        ],
        Some(HelpTopic::PlayerDetection) => vec![
            format!(
                "- For troubleshooting undetected media players find help [**here**](<{}>)",
                HELP_URL_TROUBLESHOOTING
            ),
            "- Note that your media player might need a plugin to work with Music Presence. \
             You'll find more information at the provided help page"
                .to_string(),
        ],
        Some(HelpTopic::AppLogs) => return logs_response(None),
    };

    lines.join("\n")
}

/// Download links for a release version.
///
/// Without a known version only the link to the latest release page is returned.
pub fn download_urls(version: Option<&str>) -> Vec<(&'static str, String)> {
    let mut urls = Vec::new();

    if let Some(version) = version {
        let download = |file: String| format!("{}/download/v{}/{}", RELEASES_BASE_URL, version, file);
        urls.push((
            "Windows",
            download(format!("musicpresence-{}-windows-x64-installer.exe", version)),
        ));
        urls.push((
            "Mac Apple Silicon",
            download(format!("musicpresence-{}-mac-arm64.dmg", version)),
        ));
        urls.push((
            "Mac Intel",
            download(format!("musicpresence-{}-mac-x86_64.dmg", version)),
        ));
    }

    urls.push(("All downloads", format!("{}/latest", RELEASES_BASE_URL)));
    urls
}

/// Renders download links as a markdown list.
pub fn format_download_links(urls: &[(&str, String)]) -> String {
    urls.iter()
        .map(|(name, url)| format!("- [{}](<{}>)", name, url))
        .collect::<Vec<_>>()
        .join("\n")
}
