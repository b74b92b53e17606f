use crate::vitals::Condition;
use log::info;
use ratatui::style::Color;
use std::sync::atomic::{AtomicBool, Ordering};

/// Text and colour of the emergency button.
///
/// The button is labelled with the state it switches *to*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ButtonLabel {
    pub(crate) text: &'static str,
    pub(crate) colour: Color,
}

const RAISE_EMERGENCY: ButtonLabel = ButtonLabel {
    text: "EMERGENCY",
    colour: Color::Red,
};

const RETURN_TO_NORMAL: ButtonLabel = ButtonLabel {
    text: "NORMAL",
    colour: Color::Green,
};

/// The emergency flag shared between the user interface and the sampler.
///
/// Only the user interface ever writes it; the sampler reads it once per tick.
#[derive(Debug, Default)]
pub(crate) struct EmergencyToggle {
    active: AtomicBool,
}

impl EmergencyToggle {
    /// Flips the flag, returning the new value.
    pub(crate) fn toggle(&self) -> bool {
        let active = !self.active.fetch_xor(true, Ordering::Relaxed);

        if active {
            info!("Emergency raised");
        } else {
            info!("Emergency cleared");
        }

        active
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub(crate) fn condition(&self) -> Condition {
        if self.is_active() {
            Condition::Emergency
        } else {
            Condition::Normal
        }
    }

    pub(crate) fn button(&self) -> ButtonLabel {
        if self.is_active() {
            RETURN_TO_NORMAL
        } else {
            RAISE_EMERGENCY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_normal() {
        let toggle = EmergencyToggle::default();
        assert!(!toggle.is_active());
        assert_eq!(toggle.condition(), Condition::Normal);
        assert_eq!(toggle.button(), RAISE_EMERGENCY);
    }

    #[test]
    fn toggle_raises_emergency() {
        let toggle = EmergencyToggle::default();

        assert!(toggle.toggle());
        assert!(toggle.is_active());
        assert_eq!(toggle.condition(), Condition::Emergency);
        assert_eq!(
            toggle.button(),
            ButtonLabel {
                text: "NORMAL",
                colour: Color::Green
            }
        );
    }

    #[test]
    fn toggle_twice_restores_state() {
        let toggle = EmergencyToggle::default();
        let before = (toggle.is_active(), toggle.button());

        assert!(toggle.toggle());
        assert!(!toggle.toggle());

        assert_eq!((toggle.is_active(), toggle.button()), before);
    }

    #[test]
    fn toggle_from_another_thread_is_visible() {
        let toggle = Arc::new(EmergencyToggle::default());

        std::thread::spawn({
            let toggle = toggle.clone();
            move || toggle.toggle()
        })
        .join()
        .unwrap();

        assert_eq!(toggle.condition(), Condition::Emergency);
    }
}
