//! Reminder configuration and unit normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassCalError;

/// How the calendar service should deliver a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    #[default]
    Popup,
    Email,
}

impl ReminderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMethod::Popup => "popup",
            ReminderMethod::Email => "email",
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderMethod {
    type Err = ClassCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popup" => Ok(ReminderMethod::Popup),
            "email" => Ok(ReminderMethod::Email),
            other => Err(ClassCalError::Config(format!(
                "Unknown reminder method '{other}' (expected popup or email)"
            ))),
        }
    }
}

/// Unit a reminder offset is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderUnit {
    Minutes,
    Hours,
    Days,
}

impl ReminderUnit {
    pub fn minutes(&self) -> u32 {
        match self {
            ReminderUnit::Minutes => 1,
            ReminderUnit::Hours => 60,
            ReminderUnit::Days => 1440,
        }
    }
}

impl FromStr for ReminderUnit {
    type Err = ClassCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "min" | "mins" | "minute" | "minutes" | "phút" => Ok(ReminderUnit::Minutes),
            "h" | "hour" | "hours" | "giờ" => Ok(ReminderUnit::Hours),
            "d" | "day" | "days" | "ngày" => Ok(ReminderUnit::Days),
            other => Err(ClassCalError::Config(format!(
                "Unknown reminder unit '{other}' (expected minutes, hours or days)"
            ))),
        }
    }
}

/// A single reminder attached to every synced event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub method: ReminderMethod,
    pub minutes_before: u32,
}

impl ReminderConfig {
    /// Normalize `value` `unit`s before the event into minutes.
    pub fn new(method: ReminderMethod, value: u32, unit: ReminderUnit) -> Self {
        ReminderConfig {
            method,
            minutes_before: value.saturating_mul(unit.minutes()),
        }
    }

    /// Parse an offset like `"2 hours"`, `"1 day"` or `"10min"`.
    pub fn parse(method: ReminderMethod, offset: &str) -> Result<Self, ClassCalError> {
        let offset = offset.trim();
        let split = offset
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(offset.len());
        let (number, unit) = offset.split_at(split);

        let value: u32 = number.parse().map_err(|_| {
            ClassCalError::Config(format!(
                "Invalid reminder '{offset}' (expected e.g. \"10 minutes\" or \"1 day\")"
            ))
        })?;

        let unit = if unit.trim().is_empty() {
            ReminderUnit::Minutes
        } else {
            unit.parse()?
        };

        Ok(ReminderConfig::new(method, value, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_normalize_to_minutes() {
        let popup = ReminderMethod::Popup;
        assert_eq!(ReminderConfig::parse(popup, "2 hours").unwrap().minutes_before, 120);
        assert_eq!(ReminderConfig::parse(popup, "1 day").unwrap().minutes_before, 1440);
        assert_eq!(ReminderConfig::parse(popup, "10min").unwrap().minutes_before, 10);
        assert_eq!(ReminderConfig::parse(popup, "15").unwrap().minutes_before, 15);
        assert_eq!(ReminderConfig::parse(popup, "3 ngày").unwrap().minutes_before, 4320);
        assert_eq!(ReminderConfig::parse(popup, "0 minutes").unwrap().minutes_before, 0);
    }

    #[test]
    fn test_new_keeps_method() {
        let reminder = ReminderConfig::new(ReminderMethod::Email, 1, ReminderUnit::Hours);
        assert_eq!(
            reminder,
            ReminderConfig {
                method: ReminderMethod::Email,
                minutes_before: 60
            }
        );
    }

    #[test]
    fn test_rejects_unknown_input() {
        assert!(ReminderConfig::parse(ReminderMethod::Popup, "soon").is_err());
        assert!(ReminderConfig::parse(ReminderMethod::Popup, "2 weeks").is_err());
        assert!(ReminderConfig::parse(ReminderMethod::Popup, "-5 minutes").is_err());
        assert!("sms".parse::<ReminderMethod>().is_err());
    }
}
