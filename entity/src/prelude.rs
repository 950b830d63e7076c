pub use super::autolog_channel::Entity as AutologChannel;
pub use super::known_app::Entity as KnownApp;
pub use super::listener_role::Entity as ListenerRole;
pub use super::macro_entry::Entity as MacroEntry;
pub use super::sponsor_platform::Entity as SponsorPlatform;
pub use super::sponsor_platform_role::Entity as SponsorPlatformRole;
pub use super::sponsor_role::Entity as SponsorRole;
pub use super::user_app::Entity as UserApp;
