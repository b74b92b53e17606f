/// Heart rate above which a reading is critical, in beats per minute.
pub const HEART_RATE_CRITICAL_ABOVE: u16 = 120;

/// Oxygen saturation below which a reading is critical, in percent.
pub const SPO2_CRITICAL_BELOW: u8 = 90;

/// A single heart rate and oxygen saturation sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalReading {
    /// Beats per minute.
    pub heart_rate: u16,

    /// Peripheral oxygen saturation, in percent.
    pub spo2: u8,
}

impl VitalReading {
    pub fn new(heart_rate: u16, spo2: u8) -> Self {
        Self { heart_rate, spo2 }
    }

    /// Classifies the reading against the bedside alarm thresholds.
    pub fn severity(&self) -> Severity {
        if self.heart_rate > HEART_RATE_CRITICAL_ABOVE || self.spo2 < SPO2_CRITICAL_BELOW {
            Severity::Critical
        } else {
            Severity::Normal
        }
    }
}

/// Formats the reading as it appears on the wire, without the line terminator.
impl core::fmt::Display for VitalReading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}:{},{}:{}",
            crate::line::HEART_RATE_KEY,
            self.heart_rate,
            crate::line::SPO2_KEY,
            self.spo2
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Normal,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_normal() {
        assert_eq!(VitalReading::new(75, 98).severity(), Severity::Normal);
        assert_eq!(VitalReading::new(120, 90).severity(), Severity::Normal);
    }

    #[test]
    fn test_severity_high_heart_rate() {
        assert_eq!(VitalReading::new(121, 98).severity(), Severity::Critical);
    }

    #[test]
    fn test_severity_low_spo2() {
        assert_eq!(VitalReading::new(75, 89).severity(), Severity::Critical);
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Normal.to_string(), "NORMAL");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_display_is_wire_format() {
        assert_eq!(VitalReading::new(72, 96).to_string(), "HR:72,SpO2:96");
    }
}
