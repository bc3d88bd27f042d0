//! classcal configuration at ~/.config/classcal/config.toml
//!
//! Values can be overridden with `CLASSCAL_*` environment variables
//! (e.g. `CLASSCAL_PREFIX`), and by command-line flags on top of that.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ClassCalError, ClassCalResult};
use crate::reminder::{ReminderConfig, ReminderMethod};
use crate::remote::RemoteConfig;
use crate::remote::provider::Provider;

pub const DEFAULT_PROVIDER: &str = "google";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_PREFIX: &str = "[TKB]";
pub const DEFAULT_TIMEZONE: &str = "Asia/Ho_Chi_Minh";
pub const DEFAULT_REMINDER: &str = "10 minutes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassCalConfig {
    pub provider: String,
    /// Account the provider authenticated (e.g. a Google email address).
    pub google_account: Option<String>,
    pub calendar_id: String,
    /// Tag put in front of every event title.
    pub prefix: String,
    /// IANA timezone the schedule's times are in.
    pub timezone: String,
    /// Offset like "10 minutes" or "1 day"; unset for no reminder.
    pub reminder: Option<String>,
    pub reminder_method: ReminderMethod,
    pub concurrency: usize,
}

impl Default for ClassCalConfig {
    fn default() -> Self {
        ClassCalConfig {
            provider: DEFAULT_PROVIDER.to_string(),
            google_account: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            reminder: Some(DEFAULT_REMINDER.to_string()),
            reminder_method: ReminderMethod::Popup,
            concurrency: 1,
        }
    }
}

impl ClassCalConfig {
    pub fn config_path() -> ClassCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ClassCalError::Config("Could not determine config directory".into()))?
            .join("classcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented template on first run.
    pub fn load() -> ClassCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ClassCalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CLASSCAL").try_parsing(true))
            .build()
            .map_err(|e| ClassCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ClassCalError::Config(e.to_string()))
    }

    /// Save the current config.
    pub fn save(&self, path: &Path) -> ClassCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ClassCalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| ClassCalError::Config(format!("Could not write config file: {e}")))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ClassCalResult<()> {
        let contents = format!(
            "\
# classcal configuration

# Calendar provider (a classcal-provider-<name> binary on PATH):
# provider = \"{DEFAULT_PROVIDER}\"

# Account to sync into (set by `classcal auth`):
# google_account = \"you@gmail.com\"

# Calendar to sync into:
# calendar_id = \"{DEFAULT_CALENDAR_ID}\"

# Tag put in front of every event title. Purging removes events by this tag.
# prefix = \"{DEFAULT_PREFIX}\"

# Timezone of the times in your schedule:
# timezone = \"{DEFAULT_TIMEZONE}\"

# Reminder before each class (minutes, hours or days) and how to deliver it:
# reminder = \"{DEFAULT_REMINDER}\"
# reminder_method = \"popup\"

# How many events to create or delete at once:
# concurrency = 1
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClassCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ClassCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn timezone(&self) -> ClassCalResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ClassCalError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn reminders(&self) -> ClassCalResult<Vec<ReminderConfig>> {
        self.reminder
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(|r| ReminderConfig::parse(self.reminder_method, r))
            .into_iter()
            .collect()
    }

    pub fn provider(&self) -> Provider {
        Provider::from_name(&self.provider)
    }

    /// Provider parameters for the configured calendar.
    pub fn remote_config(&self) -> ClassCalResult<RemoteConfig> {
        let account = self.google_account.as_deref().ok_or_else(|| {
            ClassCalError::Config(
                "No account configured. Run `classcal auth` first, or set google_account".into(),
            )
        })?;

        Ok(RemoteConfig::default()
            .with("google_account", account)
            .with("google_calendar_id", &self.calendar_id))
    }
}
