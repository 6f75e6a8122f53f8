use crate::error::EventsError;
use chrono::{DateTime, Utc};
use core_types::YearRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity of a notice shown next to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A user-visible message explaining why part of the view was withheld or an action failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// One user interaction. Each event triggers exactly one pipeline pass.
///
/// Serialized as `{"type": "...", "payload": ...}` so browser clients can post them as-is:
/// `{ "type": "SetRange", "payload": { "start": 2019, "end": 2021 } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardEvent {
    /// The year slider moved. The range is not validated here; the session reports a
    /// reversed range as a notice.
    SetRange(YearRange),
    /// The "显示利润" checkbox changed.
    ToggleProfit(bool),
    AddCode(String),
    RemoveCode(String),
    /// Fetch the sales table again, replacing the current one.
    Reload,
    /// Re-seed the watchlist mirror from the store.
    Refresh,
}

/// Parses the line commands of the interactive terminal mode:
/// `range <start> <end>`, `profit on|off`, `add <code>`, `remove <code>`, `reload`, `refresh`.
impl FromStr for DashboardEvent {
    type Err = EventsError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let unknown = || EventsError::UnknownCommand(line.trim().to_string());
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(unknown)?;
        let args: Vec<&str> = words.collect();

        let event = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("range", [start, end]) => DashboardEvent::SetRange(YearRange {
                start: start.parse().map_err(|_| unknown())?,
                end: end.parse().map_err(|_| unknown())?,
            }),
            ("profit", ["on"]) => DashboardEvent::ToggleProfit(true),
            ("profit", ["off"]) => DashboardEvent::ToggleProfit(false),
            ("add", [code]) => DashboardEvent::AddCode(code.to_string()),
            ("remove", [code]) => DashboardEvent::RemoveCode(code.to_string()),
            ("reload", []) => DashboardEvent::Reload,
            ("refresh", []) => DashboardEvent::Refresh,
            _ => return Err(unknown()),
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_commands() {
        assert_eq!(
            "range 2019 2021".parse::<DashboardEvent>().unwrap(),
            DashboardEvent::SetRange(YearRange { start: 2019, end: 2021 })
        );
        assert_eq!(
            "profit off".parse::<DashboardEvent>().unwrap(),
            DashboardEvent::ToggleProfit(false)
        );
        assert_eq!(
            "  ADD sh600519 ".parse::<DashboardEvent>().unwrap(),
            DashboardEvent::AddCode("sh600519".to_string())
        );
        assert_eq!("reload".parse::<DashboardEvent>().unwrap(), DashboardEvent::Reload);
    }

    #[test]
    fn rejects_malformed_commands() {
        for line in ["", "range 2019", "range a b", "profit maybe", "add", "jump"] {
            assert!(line.parse::<DashboardEvent>().is_err(), "{line:?} should not parse");
        }
    }

    #[test]
    fn serializes_with_type_and_payload() {
        let json = serde_json::to_value(DashboardEvent::SetRange(YearRange { start: 2019, end: 2021 })).unwrap();
        assert_eq!(json["type"], "SetRange");
        assert_eq!(json["payload"]["start"], 2019);
    }
}
