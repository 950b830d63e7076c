//! Presence evaluator: decides whether a member is listening to a tracked application.
//!
//! The evaluator is pure. It never touches role state or storage; the one permitted
//! side effect (bumping a matched override's timestamp) is left to the caller through
//! `Evaluation::matched`.

use crate::{
    model::{
        activity::{Activity, MemberSnapshot},
        user_app::UserApp,
    },
    service::catalog::KnownAppRegistry,
};

/// What made a member count as listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSource {
    /// The activity's application is in the registry.
    Registry,
    /// The activity's application is the member's own override.
    Override(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub listening: bool,
    pub matched: Option<MatchSource>,
}

impl Evaluation {
    fn not_listening() -> Self {
        Self {
            listening: false,
            matched: None,
        }
    }

    /// Application ID of the matched override, if the override is what matched.
    pub fn matched_override(&self) -> Option<&str> {
        match &self.matched {
            Some(MatchSource::Override(app_id)) => Some(app_id.as_str()),
            _ => None,
        }
    }
}

/// Evaluates a member's presence.
///
/// Hidden members (offline or invisible) are never listening. Otherwise activities are
/// scanned in the order the gateway delivered them, skipping Spotify and non-listening
/// activities; the first one whose application is in the registry or equals the user's
/// override wins. The registry is consulted before the override.
///
/// # Arguments
/// - `snapshot` - Member status, activities and roles
/// - `registry` - Known application registry
/// - `user_override` - The member's override, if any
pub fn evaluate(
    snapshot: &MemberSnapshot,
    registry: &KnownAppRegistry,
    user_override: Option<&UserApp>,
) -> Evaluation {
    if snapshot.status.is_hidden() {
        return Evaluation::not_listening();
    }

    for activity in &snapshot.activities {
        let Activity::Listening {
            application_id: Some(app_id),
        } = activity
        else {
            continue;
        };

        if registry.contains(app_id) {
            return Evaluation {
                listening: true,
                matched: Some(MatchSource::Registry),
            };
        }

        if let Some(user_app) = user_override.filter(|u| &u.app_id == app_id) {
            return Evaluation {
                listening: true,
                matched: Some(MatchSource::Override(user_app.app_id.clone())),
            };
        }
    }

    Evaluation::not_listening()
}

pub fn is_listening(
    snapshot: &MemberSnapshot,
    registry: &KnownAppRegistry,
    user_override: Option<&UserApp>,
) -> bool {
    evaluate(snapshot, registry, user_override).listening
}
