//! Status enums shared between the store and the notification system.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual category of a toast notification.
///
/// `Error` is also used for "removed from favorites", which is a cosmetic
/// choice rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Message shown when a notification is triggered without one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Success => "Success!",
            Self::Error => "An error occurred.",
            Self::Info => "Information",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown notification kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct ParseNotificationKindError(String);

impl FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            other => Err(ParseNotificationKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_messages() {
        assert_eq!(NotificationKind::Success.default_message(), "Success!");
        assert_eq!(NotificationKind::Error.default_message(), "An error occurred.");
        assert_eq!(NotificationKind::Info.default_message(), "Information");
    }

    #[test]
    fn test_parse_round_trips_display() {
        for kind in [
            NotificationKind::Success,
            NotificationKind::Error,
            NotificationKind::Info,
        ] {
            assert_eq!(kind.to_string().parse::<NotificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("warning".parse::<NotificationKind>().is_err());
    }
}
