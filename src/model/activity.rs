//! Presence snapshot of a guild member as delivered by the gateway.
//!
//! Snapshots are ephemeral: they are built from a Serenity presence and member on
//! every event and never persisted.

/// Online status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
    Invisible,
}

impl PresenceStatus {
    /// Returns true for statuses under which a member is never considered listening.
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Offline | Self::Invisible)
    }
}

/// A single activity from a member's presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// A "Listening to" activity, optionally published by an application.
    Listening { application_id: Option<String> },
    /// Spotify's own integration, which is never tracked even though it is a
    /// listening activity.
    Spotify,
    /// Any other activity kind (playing, streaming, custom status, ...).
    Other,
}

impl Activity {
    /// Classifies raw gateway activity data.
    ///
    /// Spotify is recognised by a party ID with the `spotify:` prefix, or by the
    /// `Spotify` name together with the sync flag, which is how the integration
    /// presents itself.
    ///
    /// # Arguments
    /// - `listening` - Whether the activity type is "Listening"
    /// - `name` - Activity name
    /// - `application_id` - Publishing application, if any
    /// - `synced` - Whether the activity carries the `SYNC` flag
    /// - `party_id` - Party ID, if any
    pub fn classify(
        listening: bool,
        name: &str,
        application_id: Option<u64>,
        synced: bool,
        party_id: Option<&str>,
    ) -> Self {
        if !listening {
            return Self::Other;
        }

        let spotify_party = party_id.is_some_and(|id| id.starts_with("spotify:"));
        if spotify_party || (name == "Spotify" && synced) {
            return Self::Spotify;
        }

        Self::Listening {
            application_id: application_id.map(|id| id.to_string()),
        }
    }
}

/// Everything the presence evaluator and role reconciler need to know about a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub guild_id: u64,
    pub user_id: u64,
    pub status: PresenceStatus,
    /// Activities in the order the gateway delivered them.
    pub activities: Vec<Activity>,
    /// Held role IDs in the order the gateway delivered them.
    pub roles: Vec<u64>,
}

impl MemberSnapshot {
    pub fn holds(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }

    /// Returns the application ID of the first trackable listening activity.
    ///
    /// Used when a member registers an override for whatever they are listening to.
    pub fn listening_application_id(&self) -> Option<&str> {
        self.activities.iter().find_map(|activity| match activity {
            Activity::Listening {
                application_id: Some(id),
            } => Some(id.as_str()),
            _ => None,
        })
    }
}
