use core::ops::RangeInclusive;
use rand::Rng;
use vitalsim_protocol::VitalReading;

/// Which range policy synthetic readings are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub(crate) enum Condition {
    Normal,
    Emergency,
}

impl Condition {
    pub(crate) fn ranges(self) -> &'static VitalRanges {
        match self {
            Condition::Normal => &NORMAL_RANGES,
            Condition::Emergency => &EMERGENCY_RANGES,
        }
    }
}

/// Inclusive bounds that each field of a reading is drawn uniformly from.
#[derive(Debug)]
pub(crate) struct VitalRanges {
    pub(crate) heart_rate: RangeInclusive<u16>,
    pub(crate) spo2: RangeInclusive<u8>,
}

/// A resting adult with healthy oxygenation.
pub(crate) static NORMAL_RANGES: VitalRanges = VitalRanges {
    heart_rate: 72..=82,
    spo2: 96..=99,
};

/// Tachycardia with hypoxaemia, kept well clear of the normal ranges.
pub(crate) static EMERGENCY_RANGES: VitalRanges = VitalRanges {
    heart_rate: 140..=160,
    spo2: 75..=85,
};

impl VitalRanges {
    /// Draws each field independently.
    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> VitalReading {
        VitalReading::new(
            rng.gen_range(self.heart_rate.clone()),
            rng.gen_range(self.spo2.clone()),
        )
    }
}
