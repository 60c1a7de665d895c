//! Field identifiers and per-field outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The fixed set of data points published by a monitoring page.
///
/// Each variant maps to the `id` attribute of the element that carries the
/// value in the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldId {
    /// Date the meter went online
    #[serde(rename = "lbl_online_date")]
    OnlineDate,
    /// Generation so far today (kWh)
    #[serde(rename = "lbl_daily_pw")]
    DailyPower,
    /// Revenue so far today
    #[serde(rename = "lbl_today_price")]
    TodayPrice,
    /// Revenue since the meter went online
    #[serde(rename = "lbl_total_price")]
    TotalPrice,
    /// Timestamp of the station's last update
    #[serde(rename = "lbl_system_time")]
    SystemTime,
}

impl FieldId {
    /// All identifiers, in page order.
    pub const ALL: [FieldId; 5] = [
        FieldId::OnlineDate,
        FieldId::DailyPower,
        FieldId::TodayPrice,
        FieldId::TotalPrice,
        FieldId::SystemTime,
    ];

    /// Fields summed across targets unless configured otherwise.
    pub const DEFAULT_AGGREGATES: [FieldId; 2] = [FieldId::DailyPower, FieldId::TodayPrice];

    /// The element id used in markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::OnlineDate => "lbl_online_date",
            FieldId::DailyPower => "lbl_daily_pw",
            FieldId::TodayPrice => "lbl_today_price",
            FieldId::TotalPrice => "lbl_total_price",
            FieldId::SystemTime => "lbl_system_time",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FieldId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownField(s.to_string()))
    }
}

/// Why a field carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection refused, reset, or broken mid-body
    Network,
    /// Request exceeded its timeout
    Timeout,
    /// Non-success HTTP status
    HttpStatus,
    /// The unit of work for this target aborted (panicked)
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::HttpStatus => "HTTP status failure",
            ErrorKind::Internal => "internal failure",
        };
        f.write_str(name)
    }
}

/// Outcome for one field of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Text content of the matching element
    Present(String),
    /// The page had no element for this field
    Missing(FieldId),
    /// The target could not be fetched
    Error { kind: ErrorKind, message: String },
}

impl FieldValue {
    /// Create an error value.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        FieldValue::Error {
            kind,
            message: message.into(),
        }
    }

    /// The extracted text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Present(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing(_))
    }

    /// Error kind, if this value is an error.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            FieldValue::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
