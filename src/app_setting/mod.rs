mod identity;

pub use identity::*;

/// A value persisted in the `app_settings` table under a fixed name.
pub trait AppSetting {
    const NAME: &'static str;
}
