//! Test factory for creating Serenity Role objects.

use serenity::all::Role;

/// Creates a test Serenity Role with customizable fields.
///
/// All other fields are set to reasonable defaults (not hoisted, not managed,
/// not mentionable, with zero permissions).
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name
/// - `color` - Role color as a 32-bit integer (RGB)
/// - `position` - Role position in the hierarchy (higher = more important)
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
///
/// # Examples
///
/// ```rust,ignore
/// let role = create_test_role(123456789, "Listening", 0x1DB954, 10);
/// assert_eq!(role.position, 10);
/// ```
pub fn create_test_role(role_id: u64, name: &str, color: u32, position: i16) -> Role {
    create_test_role_with(role_id, name, color, position, 0, false)
}

/// Creates a test Serenity Role with explicit permission bits and managed flag.
///
/// # Arguments
/// - `permissions` - Raw permission bit set
/// - `managed` - Whether an integration manages the role
pub fn create_test_role_with(
    role_id: u64,
    name: &str,
    color: u32,
    position: i16,
    permissions: u64,
    managed: bool,
) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": color,
        "colors": {
            "primary_color": color,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": permissions.to_string(),
        "managed": managed,
        "mentionable": false,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}
