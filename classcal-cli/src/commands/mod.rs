pub mod auth;
pub mod preview;
pub mod purge;
pub mod sync;

use anyhow::Result;
use clap::Args;
use classcal_core::config::ClassCalConfig;
use classcal_core::{ReminderMethod, SyncOptions};

/// Flags shared by the commands that translate rows.
#[derive(Args, Debug, Default)]
pub struct ScheduleArgs {
    /// Tag put in front of every event title (e.g. "[TKB]")
    #[arg(long)]
    pub prefix: Option<String>,

    /// IANA timezone of the schedule's times (e.g. "Asia/Ho_Chi_Minh")
    #[arg(long)]
    pub timezone: Option<String>,

    /// Reminder offset like "10 minutes", "2 hours" or "1 day"; "none" to disable
    #[arg(long)]
    pub reminder: Option<String>,

    /// How the reminder is delivered: popup or email
    #[arg(long)]
    pub method: Option<ReminderMethod>,
}

impl ScheduleArgs {
    /// Layer the flags over the loaded configuration.
    pub fn apply(&self, config: &mut ClassCalConfig) {
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(timezone) = &self.timezone {
            config.timezone = timezone.clone();
        }
        if let Some(reminder) = &self.reminder {
            config.reminder = (!reminder.eq_ignore_ascii_case("none")).then(|| reminder.clone());
        }
        if let Some(method) = self.method {
            config.reminder_method = method;
        }
    }
}

pub fn sync_options(config: &ClassCalConfig) -> Result<SyncOptions> {
    Ok(SyncOptions::new(&config.prefix, config.timezone()?)?
        .with_reminders(config.reminders()?)
        .with_concurrency(config.concurrency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = ClassCalConfig::default();
        ScheduleArgs {
            prefix: Some("[HK2]".into()),
            reminder: Some("1 day".into()),
            method: Some(ReminderMethod::Email),
            ..Default::default()
        }
        .apply(&mut config);

        let options = sync_options(&config).unwrap();
        assert_eq!(options.prefix, "[HK2]");
        assert_eq!(options.timezone, chrono_tz::Asia::Ho_Chi_Minh);
        assert_eq!(options.reminders[0].minutes_before, 1440);
        assert_eq!(options.reminders[0].method, ReminderMethod::Email);
    }

    #[test]
    fn test_reminder_none_disables_reminders() {
        let mut config = ClassCalConfig::default();
        ScheduleArgs {
            reminder: Some("none".into()),
            ..Default::default()
        }
        .apply(&mut config);

        assert!(sync_options(&config).unwrap().reminders.is_empty());
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let mut config = ClassCalConfig::default();
        ScheduleArgs {
            timezone: Some("Mars/Olympus".into()),
            ..Default::default()
        }
        .apply(&mut config);

        assert!(sync_options(&config).is_err());
    }
}
