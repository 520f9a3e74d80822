//! Configuration for the command-line report tool.

use std::path::Path;

use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::{Error, store::OutletSettings};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Settings read from a JSON file such as:
///
/// ```json
/// { "timezone": "Asia/Kolkata", "outlet_name": "City Mobiles", "sec_name": "Asha" }
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A canonical timezone name used to read sale timestamps as local dates.
    pub timezone: String,
    pub outlet_name: String,
    /// The name of the sales executive shown in report headers.
    pub sec_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_owned(),
            outlet_name: String::new(),
            sec_name: String::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the text is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|error| Error::InvalidConfig(error.to_string()))
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            Error::InvalidConfig(format!("could not read {}: {error}", path.display()))
        })?;

        Self::from_json(&text)
    }

    /// The report header text.
    pub fn outlet_settings(&self) -> OutletSettings {
        OutletSettings {
            outlet_name: self.outlet_name.clone(),
            sec_name: self.sec_name.clone(),
        }
    }

    /// The current UTC offset of the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone is not a canonical
    /// timezone name.
    pub fn local_offset(&self) -> Result<UtcOffset, Error> {
        get_local_offset(&self.timezone)
    }
}

/// Get the current UTC offset of a canonical timezone name, e.g.
/// "Asia/Kolkata".
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `canonical_timezone` is not known.
pub fn get_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
}
