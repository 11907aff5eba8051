//! Settings management for CLI set/unset commands.
//!
//! Each user-facing setting has a handler that knows how to parse, clear and
//! display it. Handlers edit an in-memory [`Settings`] value; the caller loads
//! it from the store beforehand and saves it afterwards.

pub mod error;
pub mod handlers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::settings::Settings;
use crate::core::store::{Store, StoreKey};

/// Trait for handling one setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the arguments following the key.
    ///
    /// # Returns
    /// A success message to display, or an error.
    fn set(&self, args: &[String], settings: &mut Settings) -> Result<String, SettingError>;

    /// Restore the value a first launch would pick.
    fn unset(&self, settings: &mut Settings) -> Result<String, SettingError>;

    /// Format the current value for display in `chairchat settings` output.
    fn format(&self, settings: &Settings) -> String;
}

/// Load the settings record, apply `edit`, and save it back.
pub fn edit_settings<F>(store: &Store, edit: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Settings) -> Result<String, SettingError>,
{
    let mut settings = store
        .load::<Settings>(StoreKey::Settings)
        .unwrap_or_else(Settings::detect);
    let message = edit(&mut settings)?;
    store
        .save(StoreKey::Settings, &settings)
        .map_err(|err| SettingError::StoreError(err.to_string()))?;
    Ok(message)
}
