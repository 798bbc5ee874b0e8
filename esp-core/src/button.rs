//! Button-Entprellung
//!
//! Der GPIO-Interrupt liefert Flanken, hier wird daraus ein
//! einzelnes Press-Event pro Entprell-Intervall.

/// Zeitbasierter Entpreller für Flanken-Events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    debounce_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl Debouncer {
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_accepted_ms: None,
        }
    }

    /// Flanke zum Zeitpunkt `now_ms`; `true` wenn sie als Press zählt
    pub fn accept(&mut self, now_ms: u64) -> bool {
        match self.last_accepted_ms {
            Some(last) if now_ms.saturating_sub(last) < self.debounce_ms => false,
            _ => {
                self.last_accepted_ms = Some(now_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_is_accepted() {
        let mut debouncer = Debouncer::new(50);
        assert!(debouncer.accept(0));
    }

    #[test]
    fn test_bounce_is_rejected() {
        let mut debouncer = Debouncer::new(50);
        assert!(debouncer.accept(1_000));
        assert!(!debouncer.accept(1_010));
        assert!(!debouncer.accept(1_049));
        assert!(debouncer.accept(1_050));
    }
}
