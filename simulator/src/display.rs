use chrono::{DateTime, Utc};
use vitalsim_protocol::{Severity, VitalReading};

/// Shown in place of a value until the first reading has been sent.
pub(crate) const PLACEHOLDER: &str = "--";

/// A change to one field of the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DisplayUpdate {
    HeartRate(String),
    SpO2(String),
    Severity(Severity),
}

impl DisplayUpdate {
    /// The updates that show a reading which has been sent to the board.
    pub(crate) fn for_reading(reading: &VitalReading) -> [DisplayUpdate; 3] {
        [
            DisplayUpdate::HeartRate(format!("HR: {}", reading.heart_rate)),
            DisplayUpdate::SpO2(format!("SpO2: {}", reading.spo2)),
            DisplayUpdate::Severity(reading.severity()),
        ]
    }
}

/// What the display currently shows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisplayFields {
    pub(crate) heart_rate: String,
    pub(crate) spo2: String,
    pub(crate) severity: Option<Severity>,
    pub(crate) updated: Option<DateTime<Utc>>,
}

impl Default for DisplayFields {
    fn default() -> Self {
        Self {
            heart_rate: format!("HR: {PLACEHOLDER}"),
            spo2: format!("SpO2: {PLACEHOLDER}"),
            severity: None,
            updated: None,
        }
    }
}

impl DisplayFields {
    pub(crate) fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::HeartRate(text) => self.heart_rate = text,
            DisplayUpdate::SpO2(text) => self.spo2 = text,
            DisplayUpdate::Severity(severity) => self.severity = Some(severity),
        }

        self.updated = Some(Utc::now());
    }

    pub(crate) fn status(&self) -> String {
        match self.severity {
            Some(severity) => format!("Status: {severity}"),
            None => format!("Status: {PLACEHOLDER}"),
        }
    }

    /// Seconds since the last update, if there has been one.
    pub(crate) fn age(&self, now: DateTime<Utc>) -> Option<i64> {
        self.updated.map(|updated| (now - updated).num_seconds())
    }
}
