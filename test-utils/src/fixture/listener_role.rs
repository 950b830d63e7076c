//! Fixture for listener role mapping test data.

use entity::listener_role;

/// Default test guild Discord ID.
pub const DEFAULT_GUILD_ID: &str = "100000000000000001";

/// Default "for" role Discord ID.
pub const DEFAULT_FOR_ROLE_ID: &str = "200000000000000001";

/// Default listener role Discord ID.
pub const DEFAULT_LISTENER_ROLE_ID: &str = "300000000000000001";

/// Creates a listener role entity model with default values.
///
/// The primary key is left at 0; insertion assigns the real one.
pub fn entity() -> listener_role::Model {
    listener_role::Model {
        id: 0,
        guild_id: DEFAULT_GUILD_ID.to_string(),
        for_role_id: DEFAULT_FOR_ROLE_ID.to_string(),
        listener_role_id: DEFAULT_LISTENER_ROLE_ID.to_string(),
    }
}
