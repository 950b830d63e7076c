use thiserror::Error;

/// Listener role configuration rejected at configuration time.
///
/// The `Display` text of each variant is the explanation shown to the user.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RoleConfigError {
    /// The listener role is already a for-role of another mapping.
    #[error("Cannot use <@&{0}> as a listener role. It is already used as a requirement for a listener role")]
    ListenerIsForRole(u64),

    /// The for-role is already a listener role of another mapping.
    #[error("Cannot use <@&{0}> as a requirement for a listener role. It is already used as a listener role")]
    ForIsListenerRole(u64),

    /// The bot cannot assign the role (above its own highest role, or managed).
    #[error("Cannot assign this role to server members. Make sure the bot's role is above the specified role")]
    NotAssignable,

    /// The role carries permissions, which a tracking role must not.
    #[error("Only roles without any extra permissions are allowed")]
    HasPermissions,

    /// A listener role was given without the role it applies to.
    #[error("Need a role to set the listener role for")]
    MissingForRole,
}
